//! Database error types for chronicle-db.
//!
//! `save_changes` surfaces audit-pipeline failures and storage failures as
//! the same `DatabaseError` type, so callers cannot accidentally treat an
//! audit failure as softer than a data-save failure.

use chronicle_core::errors::TrackingError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Metadata resolution or diff computation failed; the save was aborted
    /// with nothing written.
    #[error("Audit tracking failed: {0}")]
    Tracking(#[from] TrackingError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
