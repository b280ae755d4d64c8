//! store_core - Key-value storage contract for record stores
//!
//! This library provides:
//! - Storage: the get/put/delete/list contract every backend implements
//! - InMemoryStorage: a map-backed medium for tests and ephemeral use
//! - DirectoryStorage: one file per key under a root directory
//! - StorageConfig: TOML-selectable backend
//!
//! Each call is atomic for the single key it touches. Nothing here spans
//! more than one key.

mod config;
mod directory;
mod memory;

pub use config::StorageConfig;
pub use directory::DirectoryStorage;
pub use memory::InMemoryStorage;

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by a storage medium
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Durable key-value medium
///
/// Keys are `/`-separated strings. `list` returns every full key that starts
/// with `prefix`; the order is backend-defined.
pub trait Storage: Send + Sync {
    /// Read the bytes stored under `key`, or `None` if nothing is stored
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys beginning with `prefix`
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Check that a key is non-empty and made of plain path segments
///
/// Rejects empty segments, `.`/`..` segments, backslashes and NUL so a key can
/// never address anything outside the backend's namespace.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad_segment = |s: &str| s.is_empty() || s == "." || s == "..";
    if key.is_empty() || key.contains(['\\', '\0']) || key.split('/').any(bad_segment) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
