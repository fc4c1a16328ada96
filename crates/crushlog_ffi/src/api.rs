//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for the UI layer: envelopes, not throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Collection payloads cross the boundary as UTF-8 JSON strings.
//!
//! # See also
//! - docs/architecture/storage.md

use crushlog_core::db::open_db;
use crushlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    sanitize, CrushStore, SqliteBlobRepository, StoreError,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::OnceLock;

const STORE_DB_FILE_NAME: &str = "crushlog_store.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Cleans user-entered text before it is stored or displayed.
///
/// # FFI contract
/// - Sync call, pure, non-blocking.
/// - Never throws; the worst case is an empty string.
#[flutter_rust_bridge::frb(sync)]
pub fn sanitize_text(input: String) -> String {
    sanitize(&input)
}

/// Generic action response envelope for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrushActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Number of records affected, when meaningful.
    pub count: Option<u32>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CrushActionResponse {
    fn success(message: impl Into<String>, count: Option<u32>) -> Self {
        Self {
            ok: true,
            count,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            count: None,
            message: message.into(),
        }
    }
}

/// Load response envelope carrying the collection as JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrushLoadResponse {
    /// Whether the load succeeded.
    pub ok: bool,
    /// UTF-8 JSON array of crush records (empty array on failure).
    pub crushes_json: String,
    /// Number of records in `crushes_json`.
    pub count: u32,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Loads the crush collection.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; corruption is recovered internally and the worst
///   visible outcome is an empty collection.
#[flutter_rust_bridge::frb(sync)]
pub fn load_crushes() -> CrushLoadResponse {
    match with_store(|store| store.load()) {
        Ok(records) => {
            let count = records.len() as u32;
            match serde_json::to_string(&records) {
                Ok(crushes_json) => CrushLoadResponse {
                    ok: true,
                    crushes_json,
                    count,
                    message: format!("Loaded {count} crush(es)."),
                },
                Err(err) => CrushLoadResponse {
                    ok: false,
                    crushes_json: "[]".to_string(),
                    count: 0,
                    message: format!("load_crushes failed: {err}"),
                },
            }
        }
        Err(err) => CrushLoadResponse {
            ok: false,
            crushes_json: "[]".to_string(),
            count: 0,
            message: format!("load_crushes failed: {err}"),
        },
    }
}

/// Validates and persists the crush collection.
///
/// Input is the full collection as a JSON array; invalid records are
/// dropped silently, matching the in-app save semantics.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; capacity and input errors come back as `ok = false`
///   with a user-presentable message.
#[flutter_rust_bridge::frb(sync)]
pub fn save_crushes(crushes_json: String) -> CrushActionResponse {
    let candidates: Value = match serde_json::from_str(&crushes_json) {
        Ok(value) => value,
        Err(_) => return CrushActionResponse::failure("Expected a JSON array of crushes."),
    };

    match with_store(|store| store.save(&candidates)) {
        Ok(count) => {
            CrushActionResponse::success(format!("Saved {count} crush(es)."), Some(count as u32))
        }
        Err(StoreError::Input) => {
            CrushActionResponse::failure("Expected a JSON array of crushes.")
        }
        Err(err @ StoreError::Capacity { .. }) => {
            CrushActionResponse::failure(format!("Collection too large to save: {err}"))
        }
        Err(err) => CrushActionResponse::failure(format!("save_crushes failed: {err}")),
    }
}

/// Clears the stored collection, keeping one backup generation.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_crushes() -> CrushActionResponse {
    match with_store(|store| store.clear()) {
        Ok(()) => CrushActionResponse::success("Cleared.", None),
        Err(err) => CrushActionResponse::failure(format!("clear_crushes failed: {err}")),
    }
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("CRUSHLOG_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&CrushStore<SqliteBlobRepository<'_>>) -> crushlog_core::StoreResult<T>,
) -> Result<T, StoreError> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(crushlog_core::RepoError::from)?;
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));
    f(&store)
}
