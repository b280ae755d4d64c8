//! Backend configuration loaded from TOML
//!
//! ```toml
//! namespace = "players/"
//! max_experience = 1000000
//!
//! [storage]
//! backend = "directory"
//! path = "/var/lib/players"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use store_core::{validate_key, StorageConfig, StorageError};
use thiserror::Error;

/// Error loading backend configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error("Validation error in '{path:?}': {message}")]
    Validation {
        message: String,
        path: Option<PathBuf>,
    },
    #[error("Failed to open storage: {0}")]
    Storage(#[from] StorageError),
}

/// Settings for a [`PlayerBackend`](crate::PlayerBackend)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    /// Key prefix for every record
    #[serde(default)]
    pub namespace: String,
    /// Largest experience value accepted on write
    #[serde(default)]
    pub max_experience: Option<i64>,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl BackendConfig {
    /// Load and validate a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: path.to_path_buf(),
        })?;
        Self::parse(&content, Some(path))
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: BackendConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.map(Path::to_path_buf),
        })?;

        config.validate().map_err(|message| ConfigError::Validation {
            message,
            path: path.map(Path::to_path_buf),
        })?;
        Ok(config)
    }

    /// Check values that the TOML schema cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.max_experience {
            if limit < 0 {
                return Err(format!("max_experience must be >= 0, got {}", limit));
            }
        }

        let namespace = self.namespace.trim_end_matches('/');
        if !namespace.is_empty() && validate_key(namespace).is_err() {
            return Err(format!("invalid namespace '{}'", self.namespace));
        }

        if let StorageConfig::Directory { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err("directory storage requires a non-empty path".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("backend.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = BackendConfig::from_toml_str("").unwrap();
        assert_eq!(config, BackendConfig::default());
        assert_eq!(config.storage, StorageConfig::InMemory);
        assert_eq!(config.max_experience, None);
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"
namespace = "players/"
max_experience = 1000000

[storage]
backend = "directory"
path = "/var/lib/players"
"#,
        );

        let config = BackendConfig::load_from_path(&path).unwrap();
        assert_eq!(config.namespace, "players/");
        assert_eq!(config.max_experience, Some(1_000_000));
        assert_eq!(
            config.storage,
            StorageConfig::Directory {
                path: PathBuf::from("/var/lib/players")
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = BackendConfig::load_from_path(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "max_experience = \"lots\"");
        match BackendConfig::load_from_path(&path) {
            Err(ConfigError::Parse { path: Some(p), .. }) => assert_eq!(p, path),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_limit_rejected() {
        let result = BackendConfig::from_toml_str("max_experience = -1");
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_bad_namespace_rejected() {
        let result = BackendConfig::from_toml_str(r#"namespace = "../players""#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_empty_directory_path_rejected() {
        let result = BackendConfig::from_toml_str(
            r#"
[storage]
backend = "directory"
path = ""
"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}
