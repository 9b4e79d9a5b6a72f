//! Key-value repository contract and SQLite implementation.
//!
//! # Invariants
//! - `set` is an upsert; the previous value for the key is replaced.
//! - SQLite rows carry the millisecond time of their last `set`.
//! - SQL details stay inside this module.

use crate::db::DbError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading, writing or decoding a stored value.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Stored value is not valid JSON for the requested shape, or a value
    /// could not be encoded.
    Json {
        key: String,
        source: serde_json::Error,
    },
    /// Backend refused the operation (quota, closed handle, ...).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json { key, source } => write!(f, "invalid JSON for key `{key}`: {source}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local key-value storage holding JSON text.
pub trait KeyValueRepository {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> StorageResult<bool>;
}

impl<T: KeyValueRepository + ?Sized> KeyValueRepository for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        (**self).remove(key)
    }
}

/// SQLite-backed key-value repository over the `kv_entries` table.
#[derive(Debug, Clone, Copy)]
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists stored keys, most recently written first; ties sort by key.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY updated_at DESC, key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    /// Time of the last `set` for `key`, `None` when the key is absent.
    pub fn last_modified(&self, key: &str) -> StorageResult<Option<DateTime<Utc>>> {
        let millis = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(millis.and_then(DateTime::<Utc>::from_timestamp_millis))
    }
}

impl KeyValueRepository for SqliteKvRepository<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
