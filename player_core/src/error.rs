//! Error taxonomy for player record operations

use store_core::StorageError;
use thiserror::Error;

/// Error returned by the entity store and the request handlers
///
/// "Not found" is never an error; handlers return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Malformed input: empty or invalid name, badly typed field value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A field required to create a record (or sub-record) was not supplied
    #[error("Missing field '{0}'")]
    MissingField(&'static str),
    /// Generic field read named something outside the allow-list
    #[error("Unknown field: {0}")]
    UnknownField(String),
    /// Stored bytes could not be decoded into a player record
    #[error("Corrupt record '{name}': {error}")]
    CorruptRecord {
        name: String,
        error: serde_json::Error,
    },
    /// The storage medium failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
    /// A derived value was requested from data outside its domain
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// The path does not support the requested operation
    #[error("Unsupported operation {operation} on path '{path}'")]
    UnsupportedOperation { operation: String, path: String },
    /// The path does not match any route
    #[error("Unknown path: '{0}'")]
    UnknownPath(String),
}

impl PlayerError {
    /// Whether this error rejects the request itself rather than reporting
    /// an internal failure
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            PlayerError::InvalidArgument(_)
                | PlayerError::MissingField(_)
                | PlayerError::UnknownField(_)
                | PlayerError::UnsupportedOperation { .. }
                | PlayerError::UnknownPath(_)
        )
    }

    /// Whether a caller may reasonably retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlayerError::StorageUnavailable(_))
    }
}

/// Result alias for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(PlayerError::MissingField("class").is_request_error());
        assert!(PlayerError::UnknownField("mana".into()).is_request_error());
        assert!(!PlayerError::InvalidState("negative".into()).is_request_error());

        let storage = PlayerError::from(StorageError::Poisoned("lock".into()));
        assert!(storage.is_retryable());
        assert!(!storage.is_request_error());
        assert!(!PlayerError::InvalidArgument("x".into()).is_retryable());
    }

    #[test]
    fn test_messages_name_the_offender() {
        assert_eq!(
            PlayerError::UnknownField("mana".into()).to_string(),
            "Unknown field: mana"
        );
        assert_eq!(
            PlayerError::MissingField("strength").to_string(),
            "Missing field 'strength'"
        );
    }
}
