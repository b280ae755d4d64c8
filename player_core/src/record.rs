//! Player record and its nested stats block

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nested stats sub-record; a stat never written is 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBlock {
    pub strength: i64,
    pub dexterity: i64,
}

impl StatsBlock {
    pub fn new(strength: i64, dexterity: i64) -> Self {
        StatsBlock {
            strength,
            dexterity,
        }
    }
}

impl fmt::Display for StatsBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{strength:{} dexterity:{}}}",
            self.strength, self.dexterity
        )
    }
}

/// A persisted player entity
///
/// Every attribute is either set or never set. A record created through the
/// stats path has no class or experience until a full-entity write supplies
/// them. Unset attributes are omitted from the stored form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsBlock>,
}

impl PlayerRecord {
    /// Create a record with the two fields required by a full-entity create
    pub fn new(class: impl Into<String>, experience: i64) -> Self {
        PlayerRecord {
            class: Some(class.into()),
            experience: Some(experience),
            stats: None,
        }
    }

    /// Attach a stats block
    pub fn with_stats(mut self, stats: StatsBlock) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Derived level, or `None` if experience was never set
    ///
    /// Computed on every call and never stored.
    pub fn level(&self) -> Result<Option<u64>> {
        self.experience.map(level_for).transpose()
    }
}

/// `floor(sqrt(experience))`
///
/// Fails with `InvalidState` for negative experience, which the write path
/// never stores.
pub fn level_for(experience: i64) -> Result<u64> {
    if experience < 0 {
        return Err(PlayerError::InvalidState(format!(
            "experience {} is negative",
            experience
        )));
    }
    Ok(isqrt(experience as u64))
}

/// Integer square root by Newton's method
fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = x / 2 + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
