//! Blob-slot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed read/write/delete over opaque text blobs.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A write fully replaces the previous value for its key.
//! - Reads never interpret blob contents; payload semantics live upstream.
//!
//! # See also
//! - docs/architecture/storage.md

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for blob-slot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for keyed blob slots.
pub trait BlobRepository {
    /// Reads the blob stored under `key`, if any.
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous blob.
    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes the blob stored under `key`. Removing an absent key is not
    /// an error.
    fn delete_blob(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed blob repository over the migrated `blobs` table.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM blobs WHERE key = ?1;", [key])?;
        Ok(())
    }
}
