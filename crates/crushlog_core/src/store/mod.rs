//! Collection persistence façade.
//!
//! # Responsibility
//! - Expose the load/save/clear surface consumed by UI-facing callers.
//! - Own the primary/backup slot discipline and payload ceiling.

pub mod crush_store;
