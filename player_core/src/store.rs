//! Entity store: persistence of whole player records

use crate::error::{PlayerError, Result};
use crate::record::PlayerRecord;
use crate::request::DataMap;
use serde_json::Value;
use std::sync::Arc;
use store_core::Storage;
use tracing::{debug, warn};

/// Reference marker returned in place of the inlined stats block
pub const STATS_MARKER: &str = "/stats";

/// Persists one [`PlayerRecord`] per name under a single storage key
///
/// Holds nothing but the storage handle and the key namespace, so it is
/// cheap to clone and safe to share across threads. Records are always
/// written whole; merging belongs to the caller.
#[derive(Clone)]
pub struct EntityStore {
    storage: Arc<dyn Storage>,
    namespace: String,
}

impl EntityStore {
    /// Create a store writing keys at the root of `storage`
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        EntityStore {
            storage,
            namespace: String::new(),
        }
    }

    /// Place every key under `namespace/`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let mut namespace = namespace.into();
        if !namespace.is_empty() && !namespace.ends_with('/') {
            namespace.push('/');
        }
        self.namespace = namespace;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        Ok(format!("{}{}", self.namespace, name))
    }

    /// Load a record, or `None` if nothing is stored under `name`
    pub fn get(&self, name: &str) -> Result<Option<PlayerRecord>> {
        let key = self.key(name)?;
        let Some(bytes) = self.storage.get(&key)? else {
            debug!(target: "player::store", name, "Record not found");
            return Ok(None);
        };

        let record = serde_json::from_slice(&bytes).map_err(|error| {
            warn!(target: "player::store", name, %error, "Failed to decode stored record");
            PlayerError::CorruptRecord {
                name: name.to_string(),
                error,
            }
        })?;
        debug!(target: "player::store", name, "Loaded record");
        Ok(Some(record))
    }

    /// Persist `record` under `name`, replacing whatever was there
    pub fn put(&self, name: &str, record: &PlayerRecord) -> Result<()> {
        let key = self.key(name)?;
        let bytes = serde_json::to_vec(record)
            .map_err(|e| PlayerError::InvalidState(format!("cannot encode record: {}", e)))?;
        self.storage.put(&key, &bytes)?;
        debug!(target: "player::store", name, bytes = bytes.len(), "Stored record");
        Ok(())
    }

    /// Remove the record for `name`; succeeds if there is none
    pub fn delete(&self, name: &str) -> Result<()> {
        let key = self.key(name)?;
        self.storage.delete(&key)?;
        debug!(target: "player::store", name, "Deleted record");
        Ok(())
    }

    /// Names of all stored records, in storage order
    pub fn list(&self) -> Result<Vec<String>> {
        let keys = self.storage.list(&self.namespace)?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.namespace).map(str::to_string))
            .filter(|name| !name.contains('/'))
            .collect())
    }
}

/// Read shape of the full-entity path
///
/// `stats` is a reference to the stats sub-path rather than the stats
/// themselves. Unset attributes project as `null`.
pub fn project_full_view(record: &PlayerRecord) -> Result<DataMap> {
    let mut data = DataMap::new();
    data.insert(
        "class".to_string(),
        record.class.clone().map_or(Value::Null, Value::from),
    );
    data.insert(
        "experience".to_string(),
        record.experience.map_or(Value::Null, Value::from),
    );
    data.insert(
        "level".to_string(),
        record.level()?.map_or(Value::Null, Value::from),
    );
    data.insert("stats".to_string(), Value::from(STATS_MARKER));
    Ok(data)
}

/// Lowercase a raw name and check it against the identifier pattern
pub fn normalize_name(raw: &str) -> Result<String> {
    let name = raw.to_lowercase();
    validate_name(&name)?;
    Ok(name)
}

/// A name is one or more of `[a-z0-9_.-]`, starting and ending with a
/// lowercase letter, digit or `_`
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PlayerError::InvalidArgument("missing player name".to_string()));
    }

    let word = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_';
    let inner = |c: char| word(c) || c == '-' || c == '.';
    let starts = name.starts_with(word);
    let ends = name.ends_with(word);
    if !(starts && ends && name.chars().all(inner)) {
        return Err(PlayerError::InvalidArgument(format!(
            "invalid player name '{}'",
            name
        )));
    }
    Ok(())
}
