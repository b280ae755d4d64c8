use crate::{DirectoryStorage, InMemoryStorage, Storage, StorageError};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// TOML selection of a storage backend
///
/// ```toml
/// [storage]
/// backend = "directory"
/// path = "/var/lib/players"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    InMemory,
    Directory {
        path: PathBuf,
    },
}

impl StorageConfig {
    /// Open the configured backend
    pub fn open(&self) -> Result<Arc<dyn Storage>, StorageError> {
        match self {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::new())),
            StorageConfig::Directory { path } => Ok(Arc::new(DirectoryStorage::open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        storage: StorageConfig,
    }

    #[test]
    fn test_parse_in_memory() {
        let wrapper: Wrapper = toml::from_str(
            r#"
[storage]
backend = "in_memory"
"#,
        )
        .unwrap();
        assert_eq!(wrapper.storage, StorageConfig::InMemory);
    }

    #[test]
    fn test_parse_directory() {
        let wrapper: Wrapper = toml::from_str(
            r#"
[storage]
backend = "directory"
path = "/tmp/players"
"#,
        )
        .unwrap();
        assert_eq!(
            wrapper.storage,
            StorageConfig::Directory {
                path: PathBuf::from("/tmp/players")
            }
        );
    }

    #[test]
    fn test_directory_requires_path() {
        let result: Result<Wrapper, _> = toml::from_str(
            r#"
[storage]
backend = "directory"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_open_directory_backend() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig::Directory {
            path: dir.path().join("data"),
        };
        let storage = config.open().unwrap();
        storage.put("alice", b"a").unwrap();
        assert_eq!(storage.list("").unwrap(), vec!["alice"]);
    }
}
