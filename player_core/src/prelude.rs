//! Prelude module for convenient imports
//!
//! ```rust
//! use player_core::prelude::*;
//! ```

// Service and routing
pub use crate::handlers::PlayerBackend;
pub use crate::paths::PlayerPath;
pub use crate::request::{Operation, Request, Response};

// Records
pub use crate::record::{PlayerRecord, StatsBlock};
pub use crate::store::EntityStore;

// Errors and config
pub use crate::config::BackendConfig;
pub use crate::error::PlayerError;
