//! Schema gate for persisted crush records.
//!
//! # Responsibility
//! - Decide whether an untyped persisted candidate is trustworthy enough
//!   to load as a `CrushRecord`.
//! - Filter raw collections down to well-formed records, preserving order.
//!
//! # Invariants
//! - Predicates are pure and never panic; malformed or missing fields
//!   simply evaluate false.
//! - One invalid nested action entry disqualifies the whole parent record.
//! - `mistakes` is range-checked only; integrality and nested-ID
//!   uniqueness are deliberately not enforced.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::crush::CrushRecord;
use chrono::DateTime;
use serde_json::Value;

/// Maximum length of `name`, in Unicode scalar values.
pub const NAME_MAX_CHARS: usize = 50;
/// Maximum length of record and entry `description` fields.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Maximum length of an action entry `title`.
pub const TITLE_MAX_CHARS: usize = 100;
/// Closed range admitted for `mistakes`.
pub const MISTAKES_RANGE: (f64, f64) = (0.0, 5.0);

/// Returns whether `candidate` is a well-formed crush record.
///
/// All of the following must hold:
/// - candidate is a JSON object;
/// - `id` is a non-empty string;
/// - `name` is a non-empty string of at most 50 chars;
/// - `mistakes` is a number in `[0, 5]`;
/// - `pros` and `cons` are arrays whose every element passes
///   [`is_valid_entry`];
/// - `createdAt` parses as an RFC 3339 timestamp;
/// - `description`, when present, is a string of at most 500 chars.
pub fn is_valid_record(candidate: &Value) -> bool {
    let Some(record) = candidate.as_object() else {
        return false;
    };

    if !is_non_empty_string(record.get("id"), usize::MAX) {
        return false;
    }
    if !is_non_empty_string(record.get("name"), NAME_MAX_CHARS) {
        return false;
    }

    let (min, max) = MISTAKES_RANGE;
    match record.get("mistakes").and_then(Value::as_f64) {
        Some(value) if value >= min && value <= max => {}
        _ => return false,
    }

    let Some(pros) = record.get("pros").and_then(Value::as_array) else {
        return false;
    };
    let Some(cons) = record.get("cons").and_then(Value::as_array) else {
        return false;
    };
    if !pros.iter().chain(cons).all(is_valid_entry) {
        return false;
    }

    if !is_valid_timestamp(record.get("createdAt")) {
        return false;
    }

    is_absent_or_bounded_string(record.get("description"), DESCRIPTION_MAX_CHARS)
}

/// Returns whether `candidate` is a well-formed action entry: non-empty
/// `id`, non-empty `title` of at most 100 chars, and an optional
/// `description` of at most 500 chars.
pub fn is_valid_entry(candidate: &Value) -> bool {
    let Some(entry) = candidate.as_object() else {
        return false;
    };

    is_non_empty_string(entry.get("id"), usize::MAX)
        && is_non_empty_string(entry.get("title"), TITLE_MAX_CHARS)
        && is_absent_or_bounded_string(entry.get("description"), DESCRIPTION_MAX_CHARS)
}

/// Keeps only the candidates that pass [`is_valid_record`], decoded into
/// typed records, in their original relative order.
///
/// Dropping is silent here; aggregate accounting belongs to the store.
pub fn filter_valid(candidates: &[Value]) -> Vec<CrushRecord> {
    candidates
        .iter()
        .filter(|candidate| is_valid_record(candidate))
        .filter_map(|candidate| serde_json::from_value(candidate.clone()).ok())
        .collect()
}

fn is_non_empty_string(value: Option<&Value>, max_chars: usize) -> bool {
    match value.and_then(Value::as_str) {
        Some(text) => {
            let len = text.chars().count();
            len >= 1 && len <= max_chars
        }
        None => false,
    }
}

fn is_absent_or_bounded_string(value: Option<&Value>, max_chars: usize) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.chars().count() <= max_chars,
        Some(_) => false,
    }
}

fn is_valid_timestamp(value: Option<&Value>) -> bool {
    match value.and_then(Value::as_str) {
        Some(text) => !text.is_empty() && DateTime::parse_from_rfc3339(text).is_ok(),
        None => false,
    }
}
