//! Crush collection store: validated load/save/clear over blob slots.
//!
//! # Responsibility
//! - Gate every record through the schema validator on both read and
//!   write paths.
//! - Keep a one-generation backup of the primary blob and fall back to it
//!   when the primary cannot be decoded.
//! - Enforce the serialized payload ceiling.
//!
//! # Invariants
//! - The backup snapshot happens strictly before any primary overwrite.
//! - The primary slot is only overwritten with a fully validated,
//!   fully serialized payload.
//! - `load` never surfaces a parse or validation failure; the worst case
//!   is an empty collection.
//!
//! Callers in multi-writer environments must serialize `save`/`clear`
//! calls per store themselves; the snapshot-then-write sequence is not
//! atomic across concurrent stores on the same database.
//!
//! # See also
//! - docs/architecture/storage.md

use crate::model::crush::CrushRecord;
use crate::repo::blob_repo::{BlobRepository, RepoError};
use crate::validate::filter_valid;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary slot key for the serialized collection.
pub const PRIMARY_KEY: &str = "crushes";
/// Backup slot key holding the immediately-prior primary blob.
pub const BACKUP_KEY: &str = "crushes_backup";
/// Ceiling for one serialized payload, in UTF-8 bytes.
pub const MAX_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for collection persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Caller passed something other than a JSON array to `save`.
    Input,
    /// Serialized payload exceeds the slot ceiling; nothing was written.
    Capacity { bytes: usize, limit: usize },
    /// Collection could not be serialized.
    Serialize(serde_json::Error),
    /// Underlying blob storage failed.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "expected a JSON array of records"),
            Self::Capacity { bytes, limit } => {
                write!(f, "payload of {bytes} bytes exceeds the {limit}-byte limit")
            }
            Self::Serialize(err) => write!(f, "failed to serialize collection: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Input | Self::Capacity { .. } => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Persistence façade for the crush collection.
pub struct CrushStore<R: BlobRepository> {
    repo: R,
}

impl<R: BlobRepository> CrushStore<R> {
    /// Creates a store over the provided blob repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the collection, recovering from corruption.
    ///
    /// Decode order: primary slot, then backup slot when the primary
    /// exists but cannot be decoded as a JSON array, then the empty
    /// collection. A missing primary is a fresh or cleared store, not
    /// corruption, so the backup is not consulted for it.
    ///
    /// Records failing the schema gate are dropped; when any were
    /// dropped, the cleaned collection is written back to the primary
    /// slot (best-effort self-heal).
    ///
    /// # Errors
    /// Only underlying storage failures propagate; parse and validation
    /// failures never do.
    pub fn load(&self) -> StoreResult<Vec<CrushRecord>> {
        let primary = self.repo.read_blob(PRIMARY_KEY)?;
        let candidates = match primary.as_deref() {
            None => Vec::new(),
            Some(blob) => match decode_candidates(blob) {
                Some(candidates) => candidates,
                None => {
                    warn!("event=store_fallback module=store status=start reason=primary_undecodable");
                    let recovered = self
                        .repo
                        .read_blob(BACKUP_KEY)?
                        .as_deref()
                        .and_then(decode_candidates);
                    match recovered {
                        Some(candidates) => {
                            info!(
                                "event=store_fallback module=store status=ok count={}",
                                candidates.len()
                            );
                            candidates
                        }
                        None => {
                            warn!("event=store_fallback module=store status=error reason=backup_undecodable");
                            Vec::new()
                        }
                    }
                }
            },
        };

        let records = filter_valid(&candidates);
        let dropped = candidates.len() - records.len();
        if dropped > 0 {
            self.self_heal(&records, dropped);
        }

        info!(
            "event=store_load module=store status=ok count={} dropped={dropped}",
            records.len()
        );
        Ok(records)
    }

    /// Validates and persists a collection of untyped candidates.
    ///
    /// Invalid records are silently dropped; the count of records
    /// actually written is returned. The current primary blob is
    /// snapshotted to the backup slot before any overwrite.
    ///
    /// # Errors
    /// - [`StoreError::Input`] when `candidates` is not a JSON array.
    /// - [`StoreError::Capacity`] when the serialized payload exceeds
    ///   [`MAX_PAYLOAD_BYTES`]; the primary slot is left unmodified.
    /// - [`StoreError::Repo`] when the primary write fails.
    pub fn save(&self, candidates: &Value) -> StoreResult<usize> {
        let Some(items) = candidates.as_array() else {
            warn!("event=store_save module=store status=error error_code=input_not_array");
            return Err(StoreError::Input);
        };

        let records = filter_valid(items);
        self.snapshot_primary_to_backup();

        let payload = serde_json::to_string(&records)?;
        if payload.len() > MAX_PAYLOAD_BYTES {
            warn!(
                "event=store_save module=store status=error error_code=capacity bytes={} limit={MAX_PAYLOAD_BYTES}",
                payload.len()
            );
            return Err(StoreError::Capacity {
                bytes: payload.len(),
                limit: MAX_PAYLOAD_BYTES,
            });
        }

        self.repo.write_blob(PRIMARY_KEY, &payload)?;
        info!(
            "event=store_save module=store status=ok count={} dropped={} bytes={}",
            records.len(),
            items.len() - records.len(),
            payload.len()
        );
        Ok(records.len())
    }

    /// Removes the primary blob after snapshotting it to the backup slot.
    pub fn clear(&self) -> StoreResult<()> {
        self.snapshot_primary_to_backup();
        self.repo.delete_blob(PRIMARY_KEY)?;
        info!("event=store_clear module=store status=ok");
        Ok(())
    }

    /// Copies the current primary blob into the backup slot.
    ///
    /// Best-effort safety net: failures are logged and swallowed so they
    /// never block the primary write.
    fn snapshot_primary_to_backup(&self) {
        let blob = match self.repo.read_blob(PRIMARY_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(err) => {
                warn!("event=store_backup_failed module=store status=error stage=read error={err}");
                return;
            }
        };
        if let Err(err) = self.repo.write_blob(BACKUP_KEY, &blob) {
            warn!("event=store_backup_failed module=store status=error stage=write error={err}");
        }
    }

    fn self_heal(&self, records: &[CrushRecord], dropped: usize) {
        self.snapshot_primary_to_backup();
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=store_self_heal module=store status=error error={err}");
                return;
            }
        };
        match self.repo.write_blob(PRIMARY_KEY, &payload) {
            Ok(()) => info!(
                "event=store_self_heal module=store status=ok kept={} dropped={dropped}",
                records.len()
            ),
            Err(err) => {
                warn!("event=store_self_heal module=store status=error error={err}");
            }
        }
    }
}

fn decode_candidates(blob: &str) -> Option<Vec<Value>> {
    serde_json::from_str::<Value>(blob)
        .ok()
        .and_then(|value| match value {
            Value::Array(items) => Some(items),
            _ => None,
        })
}
