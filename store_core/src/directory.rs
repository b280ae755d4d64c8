use crate::{validate_key, Storage, StorageError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::debug;

/// File extension for stored entries
const ENTRY_EXTENSION: &str = "entry";
/// Suffix for in-flight writes, never listed
const TEMP_SUFFIX: &str = ".entry.tmp";

/// Storage medium keeping one file per key under a root directory
///
/// Key `a/b` lives at `<root>/a/b.entry`. Each write goes to its own
/// uniquely named temporary sibling that is renamed over the target, so a
/// reader sees either the old or the new value and concurrent writers to
/// one key resolve as last-writer-wins.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

fn io_error(error: std::io::Error, path: &Path) -> StorageError {
    StorageError::Io {
        error,
        path: Some(path.to_path_buf()),
    }
}

impl DirectoryStorage {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| io_error(e, &root))?;
        debug!(target: "store::directory", root = ?root, "Opened directory storage");
        Ok(Self { root })
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, ENTRY_EXTENSION))
    }

    /// Collect keys from a directory recursively
    fn collect_dir(&self, dir: &Path, keys: &mut Vec<String>) -> Result<(), StorageError> {
        let entries = fs::read_dir(dir).map_err(|e| io_error(e, dir))?;

        for entry in entries {
            let entry = entry.map_err(|e| io_error(e, dir))?;
            let path = entry.path();

            if path.is_dir() {
                self.collect_dir(&path, keys)?;
            } else if let Some(key) = self.key_for(&path) {
                keys.push(key);
            }
        }

        Ok(())
    }

    /// Map an entry file back to its key, ignoring anything else
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?.to_str()?;
        if relative.ends_with(TEMP_SUFFIX) {
            return None;
        }
        let key = relative.strip_suffix(&format!(".{}", ENTRY_EXTENSION))?;
        Some(key.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}

impl Storage for DirectoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e, &path)),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        let parent = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(parent).map_err(|e| io_error(e, parent))?;

        let mut temp = Builder::new()
            .prefix(".")
            .suffix(TEMP_SUFFIX)
            .tempfile_in(parent)
            .map_err(|e| io_error(e, parent))?;
        temp.write_all(value).map_err(|e| io_error(e, temp.path()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| io_error(e, temp.path()))?;
        temp.persist(&path).map_err(|e| io_error(e.error, &path))?;

        debug!(target: "store::directory", key, bytes = value.len(), "Wrote entry");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e, &path)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        self.collect_dir(&self.root, &mut keys)?;
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}
