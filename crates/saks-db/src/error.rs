//! Database error types for saks-db.

use saks_core::errors::CoreError;
use thiserror::Error;

use crate::retry::is_lock_contention;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A live row with this id does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Invalid state encountered (e.g., disallowed transition, bad input).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The write lock could not be acquired within the busy timeout. Retryable.
    #[error("Lock contention: {0}")]
    LockContention(String),

    /// A sequence reservation lost a race on the uniqueness constraint. Retryable.
    #[error("Allocation conflict: {0}")]
    AllocationConflict(String),

    /// The audit record could not be appended. The enclosing operation is rolled back.
    #[error("Audit write failed: {0}")]
    AuditWrite(String),

    /// The allocation scope does not resolve to a live parent entity.
    #[error("Invalid sequence scope: {0}")]
    InvalidScope(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(libsql::Error),

    /// Core validation or payload error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether the caller may safely repeat the whole operation.
    ///
    /// Failed attempts leave nothing behind, so a retry recomputes the
    /// sequence maximum from committed rows only.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LockContention(_) | Self::AllocationConflict(_))
    }
}

impl From<libsql::Error> for DatabaseError {
    fn from(e: libsql::Error) -> Self {
        if is_lock_contention(&e) {
            Self::LockContention(e.to_string())
        } else {
            Self::LibSql(e)
        }
    }
}
