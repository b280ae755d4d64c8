//! Allow-list of fields readable through the generic `{name}/{key}` path

use crate::error::{PlayerError, Result};
use crate::record::PlayerRecord;

/// A top-level stored attribute that may be read by name
///
/// Derived values (`level`) and nested values (`strength`) are deliberately
/// absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    Class,
    Experience,
    Stats,
}

type Accessor = fn(&PlayerRecord) -> Option<String>;

static FIELDS: &[(&str, PlayerField, Accessor)] = &[
    ("class", PlayerField::Class, read_class),
    ("experience", PlayerField::Experience, read_experience),
    ("stats", PlayerField::Stats, read_stats),
];

fn read_class(record: &PlayerRecord) -> Option<String> {
    record.class.clone()
}

fn read_experience(record: &PlayerRecord) -> Option<String> {
    record.experience.map(|e| e.to_string())
}

fn read_stats(record: &PlayerRecord) -> Option<String> {
    record.stats.map(|s| s.to_string())
}

impl PlayerField {
    /// All readable fields
    pub fn all() -> impl Iterator<Item = PlayerField> {
        FIELDS.iter().map(|(_, field, _)| *field)
    }

    /// Resolve a free-text key, ignoring case
    pub fn resolve(key: &str) -> Result<Self> {
        FIELDS
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, field, _)| *field)
            .ok_or_else(|| PlayerError::UnknownField(key.to_string()))
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        self.entry().0
    }

    /// Textual value of this field, or `None` if it was never set
    pub fn read(self, record: &PlayerRecord) -> Option<String> {
        (self.entry().2)(record)
    }

    fn entry(self) -> &'static (&'static str, PlayerField, Accessor) {
        match self {
            PlayerField::Class => &FIELDS[0],
            PlayerField::Experience => &FIELDS[1],
            PlayerField::Stats => &FIELDS[2],
        }
    }
}
