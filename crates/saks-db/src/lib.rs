//! # saks-db
//!
//! libSQL storage for the Saks board-case system.
//!
//! Holds cases, comments, meetings, agendas, minutes and the PDF generation
//! log, plus the two concurrency-sensitive pieces everything else leans on:
//!
//! - **Sequence allocation**: gap-free, monotonically increasing numbers per
//!   scope (case numbers, PDF versions per meeting and document type), computed
//!   as `max + 1` inside a `BEGIN IMMEDIATE` transaction and backed by a
//!   uniqueness index.
//! - **Audit trail**: an append-only `audit_events` table, written in the same
//!   transaction as the change it describes and guarded by triggers that reject
//!   `UPDATE` and `DELETE`.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

use std::time::Duration;

use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};
use saks_config::DatabaseConfig;

/// Central database handle.
///
/// Wraps a libSQL database and one connection. A handle is used by one task
/// at a time; concurrent writers open their own handle on the same file.
pub struct SaksDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SaksDb {
    /// Open a local database at `path` with default connection settings.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open a database using the full connection configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, a PRAGMA is
    /// rejected, or migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(&config.path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let timeout = Duration::from_millis(config.busy_timeout_ms);
        pragma(&conn, &format!("PRAGMA busy_timeout = {}", timeout.as_millis())).await?;

        if config.wal && !config.is_in_memory() {
            pragma(&conn, "PRAGMA journal_mode = WAL").await?;
        }

        let saks_db = Self { db, conn };
        saks_db.run_migrations().await?;
        tracing::debug!(path = %config.path, wal = config.wal, "database opened");
        Ok(saks_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Start a write transaction that takes the database write lock up front.
    ///
    /// With `BEGIN IMMEDIATE` the lock is held from the first read, so a
    /// `max + 1` computed inside the transaction cannot be raced by another
    /// writer. Waits up to the busy timeout for the lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LockContention` if the lock is not acquired in time.
    pub async fn begin_write(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?)
    }
}

/// Commit `tx` if `result` is `Ok`, otherwise roll it back and hand the error on.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed after {e}");
            }
            Err(e)
        }
    }
}

/// Run a PRAGMA that reports its new value as a row.
async fn pragma(conn: &libsql::Connection, sql: &str) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("{sql}: {e}")))?;
    while rows.next().await?.is_some() {}
    Ok(())
}
