//! Persistence-boundary repositories.
//!
//! # Responsibility
//! - Keep SQL details behind narrow repository traits.
//! - Expose blob-slot storage used by the collection store.

pub mod blob_repo;
