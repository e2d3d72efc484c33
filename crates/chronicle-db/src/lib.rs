//! # chronicle-db
//!
//! libSQL persistence for Chronicle audit tracking.
//!
//! `ChronicleDb` owns the database handle and connection; `ChronicleService`
//! wraps it with a `TrackingRegistry` and hosts the commit coordinator and
//! the query surface as `impl ChronicleService` blocks under `repos/`.
//!
//! Uses the `libsql` crate (C `SQLite` fork) — audit rows are written inside
//! the same transaction as the business mutations they describe, so the
//! storage engine's isolation is the only synchronization needed.

pub mod blocking;
pub mod changes;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle for the audit store.
///
/// Wraps a libSQL database and connection. Migrations run automatically
/// on open and are idempotent.
pub struct ChronicleDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ChronicleDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let chronicle = Self { db, conn };
        chronicle.run_migrations().await?;
        Ok(chronicle)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> ChronicleDb {
        ChronicleDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["audit_log", "audit_log_detail"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        // Run migrations again — should not fail
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn event_type_check_constraint() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO audit_log (table_name, record_id, event_type, event_date_utc)
                 VALUES ('t', '1', 'exploded', '2026-01-01T00:00:00+00:00')",
                (),
            )
            .await;
        assert!(result.is_err(), "unknown event_type should be rejected");
    }
}
