//! Explicit store handle shared by request handlers.
//!
//! # Responsibility
//! - Own the process-wide SQLite connection with an explicit open/close
//!   lifecycle.
//! - Lend the connection to exactly one logical unit of work at a time.
//!
//! # Invariants
//! - The lock is held only for the duration of one `with_conn` closure.
//! - A poisoned lock surfaces as `DbError::StorePoisoned`, never a panic.
//! - The repository schema is verified once at open, not per call.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use crate::repo::RepoResult;
use crate::service::tracker_service::SqliteTrackerService;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// Handle to the entity store.
///
/// Construct once at process start, share behind an `Arc`, and call
/// [`Store::close`] at shutdown.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a fresh in-memory store with migrations applied.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        if let Err(err) = SqliteTrackerService::open(&conn) {
            error!(
                "event=db_schema_check module=db status=error error_code={} error={err}",
                err.code()
            );
            return Err(DbError::SchemaCheck(err.to_string()));
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs `work` with exclusive access to the connection.
    pub fn with_conn<T, E>(&self, work: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let guard = self.conn.lock().map_err(|_| E::from(DbError::StorePoisoned))?;
        work(&guard)
    }

    /// Runs `work` against the tracker service with exclusive access to the
    /// connection.
    pub fn with_service<T>(
        &self,
        work: impl FnOnce(&SqliteTrackerService<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.with_conn(|conn| work(&SqliteTrackerService::verified(conn)))
    }

    /// Round-trips a trivial query to prove the connection is usable.
    pub fn ping(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }

    /// Closes the underlying connection, flushing pending state.
    pub fn close(self) -> DbResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| DbError::StorePoisoned)?;
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!("event=db_close module=db status=error error={err}");
                Err(err.into())
            }
        }
    }
}
