//! Tracker schema migrations.
//!
//! Each entry is `(version, sql)` with strictly increasing versions. The
//! highest applied version lives in `PRAGMA user_version`, so reopening a
//! migrated file only runs what it has not seen yet.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const MIGRATIONS: [(u32, &str); 2] = [
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_project_client_guard.sql")),
];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`] inside one transaction.
///
/// A database stamped by a newer binary is rejected untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let tx = conn.transaction()?;
    for (version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > from) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    if from < to {
        info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    }
    Ok(())
}
