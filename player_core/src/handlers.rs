//! Request handlers for the full-entity path and its sub-resources
//!
//! Every handler loads the whole record, projects or merges the requested
//! slice, and (for writes) puts the whole record back. There is no locking:
//! two writers racing on one name resolve as last-writer-wins.

use crate::config::{BackendConfig, ConfigError};
use crate::error::{PlayerError, Result};
use crate::field::PlayerField;
use crate::record::{PlayerRecord, StatsBlock};
use crate::request::{FieldData, Response};
use crate::store::{normalize_name, project_full_view, EntityStore};
use std::sync::Arc;
use store_core::Storage;
use tracing::{info, warn};

/// Whether a write found an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Stateless service over an [`EntityStore`]
///
/// `Ok(None)` from any handler means "no content": the record (or the
/// requested part of it) does not exist, or the write succeeded.
#[derive(Clone)]
pub struct PlayerBackend {
    store: EntityStore,
    max_experience: Option<i64>,
}

impl PlayerBackend {
    /// Backend over `storage` with no namespace and no experience limit
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_store(EntityStore::new(storage))
    }

    pub fn with_store(store: EntityStore) -> Self {
        PlayerBackend {
            store,
            max_experience: None,
        }
    }

    /// Reject experience values above `limit` on write
    pub fn with_max_experience(mut self, limit: i64) -> Self {
        self.max_experience = Some(limit);
        self
    }

    /// Open the configured storage and build a backend over it
    pub fn from_config(config: &BackendConfig) -> std::result::Result<Self, ConfigError> {
        config
            .validate()
            .map_err(|message| ConfigError::Validation {
                message,
                path: None,
            })?;

        let store = EntityStore::new(config.storage.open()?).with_namespace(&config.namespace);
        let mut backend = Self::with_store(store);
        backend.max_experience = config.max_experience;
        Ok(backend)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Load for a merge-write, starting from an empty record if none exists
    fn load_for_write(&self, name: &str) -> Result<(WriteMode, PlayerRecord)> {
        Ok(match self.store.get(name)? {
            Some(record) => (WriteMode::Update, record),
            None => (WriteMode::Create, PlayerRecord::default()),
        })
    }

    fn save(&self, name: &str, mode: WriteMode, record: &PlayerRecord) -> Result<()> {
        self.store.put(name, record)?;
        if mode == WriteMode::Create {
            info!(target: "player::backend", name, "Created player record");
        }
        Ok(())
    }

    fn check_experience(&self, experience: i64) -> Result<()> {
        if experience < 0 {
            return Err(PlayerError::InvalidArgument(format!(
                "experience must be >= 0, got {}",
                experience
            )));
        }
        if let Some(limit) = self.max_experience {
            if experience > limit {
                return Err(PlayerError::InvalidArgument(format!(
                    "experience {} exceeds limit {}",
                    experience, limit
                )));
            }
        }
        Ok(())
    }

    /// `{name}` read: `{class, experience, level, stats: "/stats"}`
    pub fn read_player(&self, name: &str) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        let Some(record) = self.store.get(&name)? else {
            return Ok(None);
        };
        let view = project_full_view(&record).inspect_err(|e| {
            warn!(target: "player::backend", name = %name, error = %e, "Cannot project player");
        })?;
        Ok(Some(Response::new(view)))
    }

    /// `{name}` create/update: merge `class` and `experience`
    ///
    /// Both fields are required when no record exists yet. On an existing
    /// record an absent field keeps its stored value, even if that value
    /// was never set.
    pub fn write_player(&self, name: &str, fields: FieldData<'_>) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        let class = fields.get_string("class")?;
        let experience = fields.get_int("experience")?;
        if let Some(exp) = experience {
            self.check_experience(exp)?;
        }

        let (mode, mut record) = self.load_for_write(&name)?;
        merge_field(mode, "class", class, &mut record.class)?;
        merge_field(mode, "experience", experience, &mut record.experience)?;

        self.save(&name, mode, &record)?;
        Ok(None)
    }

    /// `{name}` delete; deleting an absent record succeeds
    pub fn delete_player(&self, name: &str) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        self.store.delete(&name)?;
        Ok(None)
    }

    /// `{name}/stats` read: `{strength, dexterity}`
    pub fn read_stats(&self, name: &str) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        let stats = self.store.get(&name)?.and_then(|r| r.stats);
        Ok(stats.map(|s| {
            let mut response = Response::single("strength", s.strength);
            response.data.insert("dexterity".to_string(), s.dexterity.into());
            response
        }))
    }

    /// `{name}/stats` create/update
    ///
    /// Both values are required when no record exists yet. On an existing
    /// record each may be written alone; a stat never written before reads
    /// as 0. Class and experience are carried over untouched.
    pub fn write_stats(&self, name: &str, fields: FieldData<'_>) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        let strength = fields.get_int("strength")?;
        let dexterity = fields.get_int("dexterity")?;

        let (mode, mut record) = self.load_for_write(&name)?;
        let mut stored_strength = record.stats.map(|s| s.strength);
        let mut stored_dexterity = record.stats.map(|s| s.dexterity);
        merge_field(mode, "strength", strength, &mut stored_strength)?;
        merge_field(mode, "dexterity", dexterity, &mut stored_dexterity)?;
        record.stats = Some(StatsBlock::new(
            stored_strength.unwrap_or_default(),
            stored_dexterity.unwrap_or_default(),
        ));

        self.save(&name, mode, &record)?;
        Ok(None)
    }

    /// `{name}/level` read: `{level}` derived from experience
    pub fn read_level(&self, name: &str) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        let Some(record) = self.store.get(&name)? else {
            return Ok(None);
        };
        let level = record.level().inspect_err(|e| {
            warn!(target: "player::backend", name = %name, error = %e, "Cannot derive level");
        })?;
        Ok(level.map(|l| Response::single("level", l)))
    }

    /// `{name}/{key}` read of one allow-listed field as text
    pub fn read_field(&self, name: &str, key: &str) -> Result<Option<Response>> {
        let name = normalize_name(name)?;
        let field = PlayerField::resolve(key)?;
        let Some(record) = self.store.get(&name)? else {
            return Ok(None);
        };
        Ok(field
            .read(&record)
            .map(|value| Response::single(field.name(), value)))
    }

    /// Root list: `{keys: [...]}`
    pub fn list_players(&self) -> Result<Option<Response>> {
        Ok(Some(Response::list(self.store.list()?)))
    }
}

/// Overwrite with the supplied value, or keep the stored one
///
/// Creating a record requires every field.
fn merge_field<T>(
    mode: WriteMode,
    field: &'static str,
    supplied: Option<T>,
    stored: &mut Option<T>,
) -> Result<()> {
    match (supplied, mode) {
        (Some(value), _) => *stored = Some(value),
        (None, WriteMode::Update) => {}
        (None, WriteMode::Create) => return Err(PlayerError::MissingField(field)),
    }
    Ok(())
}
