//! Blocking entry point over the async pipeline.
//!
//! Same audit semantics as the async service — diffing is synchronous
//! either way; only the wait on the storage commit differs. The wrapper
//! owns a current-thread tokio runtime, so it must not be used from inside
//! an async context.

use chronicle_core::entities::AuditLog;
use chronicle_core::identity::UserRef;
use chronicle_core::registry::TrackingRegistry;

use crate::changes::ChangeSet;
use crate::error::DatabaseError;
use crate::repos::commit::SaveOutcome;
use crate::service::ChronicleService;

/// A synchronous facade over [`ChronicleService`].
pub struct BlockingChronicle {
    runtime: tokio::runtime::Runtime,
    service: ChronicleService,
}

impl BlockingChronicle {
    /// Open a local database and bind it to a registry, blocking.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the runtime cannot be built or the
    /// database cannot be opened.
    pub fn new_local(db_path: &str, registry: TrackingRegistry) -> Result<Self, DatabaseError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DatabaseError::Other(e.into()))?;
        let service = runtime.block_on(ChronicleService::new_local(db_path, registry))?;
        Ok(Self { runtime, service })
    }

    /// Blocking [`ChronicleService::save_changes`].
    ///
    /// # Errors
    ///
    /// Same as the async variant.
    pub fn save_changes(&self, changes: &ChangeSet) -> Result<SaveOutcome, DatabaseError> {
        self.runtime.block_on(self.service.save_changes(changes))
    }

    /// Blocking [`ChronicleService::save_changes_as`].
    ///
    /// # Errors
    ///
    /// Same as the async variant.
    pub fn save_changes_as(
        &self,
        user: Option<UserRef>,
        changes: &ChangeSet,
    ) -> Result<SaveOutcome, DatabaseError> {
        self.runtime
            .block_on(self.service.save_changes_as(user, changes))
    }

    /// Blocking [`ChronicleService::logs_for_table`].
    ///
    /// # Errors
    ///
    /// Same as the async variant.
    pub fn logs_for_table(&self, table: &str) -> Result<Vec<AuditLog>, DatabaseError> {
        self.runtime.block_on(self.service.logs_for_table(table))
    }

    /// Blocking [`ChronicleService::logs_for_record`].
    ///
    /// # Errors
    ///
    /// Same as the async variant.
    pub fn logs_for_record(
        &self,
        table: &str,
        record_id: &str,
    ) -> Result<Vec<AuditLog>, DatabaseError> {
        self.runtime
            .block_on(self.service.logs_for_record(table, record_id))
    }

    /// Blocking [`ChronicleService::logs_for_entity`].
    ///
    /// # Errors
    ///
    /// Same as the async variant.
    pub fn logs_for_entity(
        &self,
        entity: &str,
        record_id: &str,
    ) -> Result<Vec<AuditLog>, DatabaseError> {
        self.runtime
            .block_on(self.service.logs_for_entity(entity, record_id))
    }

    /// The wrapped async service.
    #[must_use]
    pub const fn service(&self) -> &ChronicleService {
        &self.service
    }
}
