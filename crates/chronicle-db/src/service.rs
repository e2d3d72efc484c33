//! Service layer binding the database handle to a tracking registry.
//!
//! `ChronicleService` wraps `ChronicleDb` (raw database access) and an
//! `Arc<TrackingRegistry>` (immutable per-entity metadata). The commit
//! coordinator and the query surface are implemented as
//! `impl ChronicleService` blocks under `repos/`.

use std::sync::Arc;

use chronicle_core::registry::TrackingRegistry;

use crate::ChronicleDb;
use crate::error::DatabaseError;

/// Orchestrates audited saves and audit-log queries.
///
/// The registry is frozen at construction; concurrent saves on clones of
/// the underlying connection only ever read it.
pub struct ChronicleService {
    db: ChronicleDb,
    registry: Arc<TrackingRegistry>,
}

impl ChronicleService {
    /// Open a local database and bind it to a registry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn new_local(
        db_path: &str,
        registry: TrackingRegistry,
    ) -> Result<Self, DatabaseError> {
        let db = ChronicleDb::open_local(db_path).await?;
        Ok(Self {
            db,
            registry: Arc::new(registry),
        })
    }

    /// Create from an existing database handle and a shared registry.
    #[must_use]
    pub fn from_db(db: ChronicleDb, registry: Arc<TrackingRegistry>) -> Self {
        Self { db, registry }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ChronicleDb {
        &self.db
    }

    /// Access the tracking registry.
    #[must_use]
    pub fn registry(&self) -> &TrackingRegistry {
        &self.registry
    }
}
