//! Domain model for crush records and their action entries.
//!
//! # Responsibility
//! - Define the canonical serde shapes persisted in the collection blob.
//! - Keep wire field names aligned with the mobile app schema (camelCase).
//!
//! # Invariants
//! - Records are only admitted to storage after passing validation.
//! - Unknown wire fields round-trip unchanged through load/save.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod crush;
