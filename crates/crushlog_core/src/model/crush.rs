//! Crush record domain model.
//!
//! # Responsibility
//! - Define `CrushRecord` and `ActionEntry`, the shapes persisted in the
//!   collection blob.
//! - Provide lifecycle helpers encoding the mistakes-counter convention.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `mistakes` stays within `0..=MISTAKES_LIMIT` on every helper path.
//! - Appending a con increments `mistakes`; removing one decrements it.
//!
//! # See also
//! - docs/architecture/data-model.md

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// A record with `mistakes == MISTAKES_LIMIT` is in the terminal
/// "destroyed" state.
pub const MISTAKES_LIMIT: u64 = 5;

/// One logged good ("pro") or bad ("con") action.
///
/// Immutable once created; owned by its parent record and only ever
/// appended to or removed from a list as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    /// Stable identifier within the parent record.
    pub id: String,
    /// Short label, 1..=100 chars after sanitization.
    pub title: String,
    /// Optional free-form detail, up to 500 chars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time in RFC 3339 form on the wire. Optional because the
    /// schema gate does not require it on nested entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Wire fields this version does not model, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionEntry {
    /// Creates an entry with a generated stable ID and current timestamp.
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description,
            created_at: Some(Utc::now()),
            extra: Map::new(),
        }
    }
}

/// Canonical domain record for one tracked crush.
///
/// `mistakes` is kept as a raw JSON number rather than an integer type:
/// the schema gate range-checks it without requiring integrality, and a
/// typed integer field would silently reject in-range non-integer values
/// that older app builds may have written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrushRecord {
    /// Stable global ID used for list identity and removal.
    pub id: String,
    /// Display name, 1..=50 chars after sanitization.
    pub name: String,
    /// Optional free-form notes, up to 500 chars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Count of logged cons, range 0..=5. 5 means "destroyed".
    pub mistakes: Number,
    /// Good actions, oldest first.
    pub pros: Vec<ActionEntry>,
    /// Bad actions, oldest first. Length moves with `mistakes` by
    /// convention, but the schema gate does not tie the two together.
    pub cons: Vec<ActionEntry>,
    /// Creation time in RFC 3339 form on the wire.
    pub created_at: DateTime<Utc>,
    /// Wire fields this version does not model, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CrushRecord {
    /// Creates a fresh record with a generated ID and `mistakes = 0`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            mistakes: Number::from(0u64),
            pros: Vec::new(),
            cons: Vec::new(),
            created_at: Utc::now(),
            extra: Map::new(),
        }
    }

    /// Current mistakes count, clamped into `0..=MISTAKES_LIMIT`.
    ///
    /// Persisted values may be non-integer (legacy writes); they are read
    /// through their floor here without being rewritten.
    pub fn mistakes_count(&self) -> u64 {
        let raw = self.mistakes.as_f64().unwrap_or(0.0);
        (raw.max(0.0).floor() as u64).min(MISTAKES_LIMIT)
    }

    /// Returns whether this record reached the terminal destroyed state.
    pub fn is_destroyed(&self) -> bool {
        self.mistakes_count() >= MISTAKES_LIMIT
    }

    /// Appends a good action.
    pub fn add_pro(&mut self, entry: ActionEntry) {
        self.pros.push(entry);
    }

    /// Appends a bad action and bumps `mistakes`, saturating at the limit.
    pub fn add_con(&mut self, entry: ActionEntry) {
        self.cons.push(entry);
        let next = (self.mistakes_count() + 1).min(MISTAKES_LIMIT);
        self.mistakes = Number::from(next);
    }

    /// Removes a pro by ID. Returns whether an entry was removed.
    pub fn remove_pro(&mut self, entry_id: &str) -> bool {
        remove_entry(&mut self.pros, entry_id)
    }

    /// Removes a con by ID and decrements `mistakes`, flooring at zero.
    ///
    /// Returns whether an entry was removed; `mistakes` is untouched when
    /// no entry matched.
    pub fn remove_con(&mut self, entry_id: &str) -> bool {
        if !remove_entry(&mut self.cons, entry_id) {
            return false;
        }
        self.mistakes = Number::from(self.mistakes_count().saturating_sub(1));
        true
    }
}

fn remove_entry(entries: &mut Vec<ActionEntry>, entry_id: &str) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.id != entry_id);
    entries.len() < before
}
