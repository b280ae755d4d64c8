use crate::{validate_key, Storage, StorageError};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Map-backed storage medium
///
/// Holds everything in process memory. Used as the substitutable fake in
/// tests and for hosts that do not need durability.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Poisoned(err.to_string())
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .range(prefix.to_string()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get("ghost").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let storage = InMemoryStorage::new();
        storage.put("alice", b"one").unwrap();
        storage.put("alice", b"two").unwrap();
        assert_eq!(storage.get("alice").unwrap(), Some(b"two".to_vec()));
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let storage = InMemoryStorage::new();
        storage.put("alice", b"x").unwrap();
        storage.delete("alice").unwrap();
        storage.delete("alice").unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_list_by_prefix() {
        let storage = InMemoryStorage::new();
        storage.put("players/bob", b"b").unwrap();
        storage.put("players/alice", b"a").unwrap();
        storage.put("guilds/red", b"r").unwrap();
        storage.put("playersx", b"p").unwrap();

        let keys = storage.list("players/").unwrap();
        assert_eq!(keys, vec!["players/alice", "players/bob"]);

        assert_eq!(storage.list("").unwrap().len(), 4);
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let storage = InMemoryStorage::new();
        storage.put("alice", b"x").unwrap();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = storage.entries.write().unwrap();
            panic!("writer died holding the lock");
        }));

        assert!(matches!(storage.len(), Err(StorageError::Poisoned(_))));
        assert!(matches!(storage.is_empty(), Err(StorageError::Poisoned(_))));
        assert!(matches!(storage.get("alice"), Err(StorageError::Poisoned(_))));
    }

    #[test]
    fn test_concurrent_writers_same_key() {
        let storage = InMemoryStorage::new();
        storage.put("alice", &[0; 256]).unwrap();

        std::thread::scope(|scope| {
            for writer in 1..=8u8 {
                let storage = &storage;
                scope.spawn(move || {
                    for _ in 0..200 {
                        storage.put("alice", &[writer; 256]).unwrap();
                    }
                });
            }
            let storage = &storage;
            scope.spawn(move || {
                for _ in 0..200 {
                    let value = storage.get("alice").unwrap().unwrap();
                    assert_eq!(value.len(), 256);
                    assert!(value.iter().all(|b| *b == value[0]));
                }
            });
        });

        let last = storage.get("alice").unwrap().unwrap();
        assert!((1..=8).contains(&last[0]));
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn test_rejects_invalid_key() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.put("../escape", b"x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
