//! player_core - Keyed store for player records
//!
//! This library provides:
//! - PlayerRecord: class, experience and a nested StatsBlock
//! - EntityStore: whole-record get/put/delete/list over any `Storage`
//! - PlayerBackend: merge-on-write handlers for the full record and its
//!   sub-resources (stats, derived level, single named field)
//! - PlayerPath: the path table and request dispatch
//!
//! # Quick Start
//!
//! ```rust
//! use player_core::prelude::*;
//! use std::sync::Arc;
//! use store_core::InMemoryStorage;
//!
//! let backend = PlayerBackend::new(Arc::new(InMemoryStorage::new()));
//!
//! let create = Request::create("alice")
//!     .with_field("class", "warrior")
//!     .with_field("experience", 16);
//! backend.handle(&create).unwrap();
//!
//! let level = backend.handle(&Request::read("alice/level")).unwrap().unwrap();
//! assert_eq!(level.get("level"), Some(&serde_json::json!(4)));
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod handlers;
pub mod paths;
pub mod prelude;
pub mod record;
pub mod request;
pub mod store;

// Core API
pub use handlers::{PlayerBackend, WriteMode};
pub use paths::{PathHelp, PlayerPath};
pub use request::{DataMap, FieldData, Operation, Request, Response};

// Records
pub use field::PlayerField;
pub use record::{level_for, PlayerRecord, StatsBlock};
pub use store::{project_full_view, EntityStore, STATS_MARKER};

// Errors and configuration
pub use config::{BackendConfig, ConfigError};
pub use error::{PlayerError, Result};
