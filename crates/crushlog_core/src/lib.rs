//! Core domain logic for CrushLog.
//! This crate is the single source of truth for text hygiene, record
//! validation and collection persistence invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sanitize;
pub mod store;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::crush::{ActionEntry, CrushRecord, MISTAKES_LIMIT};
pub use repo::blob_repo::{BlobRepository, RepoError, RepoResult, SqliteBlobRepository};
pub use sanitize::{sanitize, sanitize_value};
pub use store::crush_store::{
    CrushStore, StoreError, StoreResult, BACKUP_KEY, MAX_PAYLOAD_BYTES, PRIMARY_KEY,
};
pub use validate::{filter_valid, is_valid_entry, is_valid_record};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
