//! Commit coordinator.
//!
//! Intercepts a batch of pending entity changes, classifies each, runs the
//! diff/assembly pipeline synchronously, then persists business mutations
//! and audit rows in one libSQL transaction.
//!
//! Save protocol:
//! 1. Collect — reclassify Modified as SoftDeleted where the descriptor's
//!    soft-delete flag transitions falsy to truthy.
//! 2. Diff — assemble every audit log up front (pure CPU); any tracking
//!    error aborts before a transaction opens.
//! 3. Persist — one transaction: data ops, then audit inserts, then commit.
//!    A failure drops the transaction, which rolls everything back.

use chrono::Utc;
use tracing::debug;

use chronicle_core::assembler;
use chronicle_core::entities::AuditLog;
use chronicle_core::enums::EventType;
use chronicle_core::identity::UserRef;
use chronicle_core::registry::EntityDescriptor;
use chronicle_core::snapshot::is_truthy;

use crate::changes::{ChangeSet, PendingChange};
use crate::error::DatabaseError;
use crate::service::ChronicleService;

/// What a successful save wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Rows affected by the business mutations.
    pub data_rows: u64,
    /// Audit logs written (untracked entities contribute none).
    pub audit_logs: usize,
}

impl ChronicleService {
    /// Save a batch of changes anonymously.
    ///
    /// # Errors
    ///
    /// See [`save_changes_as`](Self::save_changes_as).
    pub async fn save_changes(&self, changes: &ChangeSet) -> Result<SaveOutcome, DatabaseError> {
        self.save_changes_as(None, changes).await
    }

    /// Save a batch of changes, attributing them to `user`.
    ///
    /// Every audit log in the batch shares one UTC instant (the commit
    /// boundary). Untracked entities pass through silently: their data ops
    /// still run, no audit rows appear.
    ///
    /// Cancelling the returned future before the commit drops the open
    /// transaction and rolls everything back; once the commit has started
    /// the write is atomic and not interruptible.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Tracking` when key resolution or diffing
    /// fails (nothing is written), or the underlying `DatabaseError` when a
    /// data op or audit insert fails (the transaction rolls back, so data
    /// and audit rows vanish together).
    pub async fn save_changes_as(
        &self,
        user: Option<UserRef>,
        changes: &ChangeSet,
    ) -> Result<SaveOutcome, DatabaseError> {
        let now = Utc::now();

        // Diff phase: pure CPU, nothing touches storage yet.
        let mut logs: Vec<AuditLog> = Vec::new();
        for change in changes {
            let Some(desc) = self.registry().resolve(&change.entity) else {
                continue;
            };
            let kind = classify(desc, change);
            let log = assembler::assemble(
                desc,
                kind,
                user.as_ref(),
                &change.prior,
                &change.current,
                now,
            )?;
            logs.push(log);
        }

        // Persist phase: one transaction for data and audit rows.
        let tx = self.db().conn().transaction().await?;

        let mut data_rows = 0u64;
        for change in changes {
            for op in &change.ops {
                data_rows += tx
                    .execute(&op.sql, libsql::params_from_iter(op.params.clone()))
                    .await?;
            }
        }

        for log in &logs {
            insert_log(&tx, log).await?;
        }

        tx.commit().await?;

        debug!(
            changes = changes.len(),
            data_rows,
            audit_logs = logs.len(),
            "save committed"
        );

        Ok(SaveOutcome {
            data_rows,
            audit_logs: logs.len(),
        })
    }
}

/// Reclassify Modified as SoftDeleted when the declared soft-delete flag
/// transitions falsy to truthy. Applies only to descriptors that opted in;
/// flag names are never guessed.
fn classify(desc: &EntityDescriptor, change: &PendingChange) -> EventType {
    if change.kind != EventType::Modified {
        return change.kind;
    }
    match desc.soft_delete_field() {
        Some(flag) if !is_truthy(change.prior.get(flag)) && is_truthy(change.current.get(flag)) => {
            EventType::SoftDeleted
        }
        _ => change.kind,
    }
}

async fn insert_log(tx: &libsql::Transaction, log: &AuditLog) -> Result<(), DatabaseError> {
    tx.execute(
        "INSERT INTO audit_log (table_name, record_id, event_type, user_name, event_date_utc)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            log.table_name.as_str(),
            log.record_id.as_str(),
            log.event_type.as_str(),
            log.user_name.as_deref(),
            log.event_date_utc.to_rfc3339()
        ],
    )
    .await?;
    let log_id = tx.last_insert_rowid();

    for detail in &log.details {
        tx.execute(
            "INSERT INTO audit_log_detail (audit_log_id, property_name, column_name, original_value, new_value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                log_id,
                detail.property_name.as_str(),
                detail.column_name.as_deref(),
                detail.original_value.as_deref(),
                detail.new_value.as_deref()
            ],
        )
        .await?;
    }
    Ok(())
}
