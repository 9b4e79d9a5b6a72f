//! Schema versions of the `kv_entries` store.
//!
//! # Responsibility
//! - List the SQL steps that build the key-value table, oldest first.
//! - Bring a connection up to the newest step in one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - `PRAGMA user_version` equals the last applied step; a file stamped with
//!   a higher version than this build knows is refused untouched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "kv_store",
        sql: include_str!("0001_kv_store.sql"),
    },
    // Backs the recency ordering of `SqliteKvRepository::keys`.
    Migration {
        version: 2,
        name: "kv_updated_at_index",
        sql: include_str!("0002_kv_updated_at_index.sql"),
    },
];

/// Newest schema version this build can create.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Schema version stamped on the database behind `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Runs every step newer than the stored schema version.
///
/// Either all pending steps land or none do.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = schema_version(conn)?;
    let latest = latest_version();
    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > stored)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;
    Ok(())
}
