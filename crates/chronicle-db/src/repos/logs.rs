//! Audit query surface.
//!
//! Read-only accessors over the persisted audit trail. Ordering is by
//! header id ascending, which is insertion/commit order; results only ever
//! contain committed rows. No logs is an empty `Vec`, not an error.

use chronicle_core::entities::{AuditLog, AuditLogDetail};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::ChronicleService;

const LOG_COLS: &str = "id, table_name, record_id, event_type, user_name, event_date_utc";

fn row_to_log(row: &libsql::Row) -> Result<AuditLog, DatabaseError> {
    Ok(AuditLog {
        id: row.get(0)?,
        table_name: row.get(1)?,
        record_id: row.get(2)?,
        event_type: parse_enum(&row.get::<String>(3)?)?,
        user_name: get_opt_string(row, 4)?,
        event_date_utc: parse_datetime(&row.get::<String>(5)?)?,
        details: Vec::new(),
    })
}

fn row_to_detail(row: &libsql::Row) -> Result<AuditLogDetail, DatabaseError> {
    Ok(AuditLogDetail {
        id: row.get(0)?,
        property_name: row.get(1)?,
        column_name: get_opt_string(row, 2)?,
        // Raw Option reads here: an empty-string value must stay distinct
        // from NULL, or the null-to-empty transition becomes unreadable.
        original_value: row.get::<Option<String>>(3)?,
        new_value: row.get::<Option<String>>(4)?,
    })
}

impl ChronicleService {
    /// All audit logs for a table, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn logs_for_table(&self, table: &str) -> Result<Vec<AuditLog>, DatabaseError> {
        self.query_logs(table, None).await
    }

    /// Audit logs for one logical record of a table, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn logs_for_record(
        &self,
        table: &str,
        record_id: &str,
    ) -> Result<Vec<AuditLog>, DatabaseError> {
        self.query_logs(table, Some(record_id)).await
    }

    /// Audit logs for one logical record, addressed by entity name.
    ///
    /// The table name resolves through the tracking registry; unregistered
    /// names fall back to the plural form, so the result is an empty list
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn logs_for_entity(
        &self,
        entity: &str,
        record_id: &str,
    ) -> Result<Vec<AuditLog>, DatabaseError> {
        let table = self.registry().table_for(entity);
        self.logs_for_record(&table, record_id).await
    }

    async fn query_logs(
        &self,
        table: &str,
        record_id: Option<&str>,
    ) -> Result<Vec<AuditLog>, DatabaseError> {
        let mut rows = if let Some(record_id) = record_id {
            self.db()
                .conn()
                .query(
                    &format!(
                        "SELECT {LOG_COLS} FROM audit_log
                         WHERE table_name = ?1 AND record_id = ?2
                         ORDER BY id"
                    ),
                    libsql::params![table, record_id],
                )
                .await?
        } else {
            self.db()
                .conn()
                .query(
                    &format!(
                        "SELECT {LOG_COLS} FROM audit_log WHERE table_name = ?1 ORDER BY id"
                    ),
                    libsql::params![table],
                )
                .await?
        };

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(row_to_log(&row)?);
        }

        for log in &mut logs {
            log.details = self.load_details(log.id).await?;
        }
        Ok(logs)
    }

    async fn load_details(&self, log_id: i64) -> Result<Vec<AuditLogDetail>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, property_name, column_name, original_value, new_value
                 FROM audit_log_detail WHERE audit_log_id = ?1 ORDER BY id",
                libsql::params![log_id],
            )
            .await?;

        let mut details = Vec::new();
        while let Some(row) = rows.next().await? {
            details.push(row_to_detail(&row)?);
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::{ChangeSet, PendingChange};
    use chronicle_core::enums::EventType;
    use chronicle_core::snapshot::Snapshot;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    async fn seed(svc: &ChronicleService) {
        let add = ChangeSet::new().with(PendingChange::added(
            "normal_model",
            Snapshot::new().set("id", 1).set("description", "X"),
        ));
        svc.save_changes(&add).await.unwrap();

        let modify = ChangeSet::new().with(PendingChange::modified(
            "normal_model",
            Snapshot::new().set("id", 1).set("description", "X"),
            Snapshot::new().set("id", 1).set("description", "Y"),
        ));
        svc.save_changes(&modify).await.unwrap();

        let other = ChangeSet::new().with(PendingChange::added(
            "child_model",
            Snapshot::new().set("id", 9).set("parent_id", 1),
        ));
        svc.save_changes(&other).await.unwrap();
    }

    #[tokio::test]
    async fn logs_for_table_scopes_and_orders() {
        let svc = test_service().await;
        seed(&svc).await;

        let logs = svc.logs_for_table("normal_models").await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].event_type, EventType::Added);
        assert_eq!(logs[1].event_type, EventType::Modified);
        assert!(logs[0].id < logs[1].id);
    }

    #[tokio::test]
    async fn logs_for_record_filters_by_record_id() {
        let svc = test_service().await;
        seed(&svc).await;

        let hit = svc.logs_for_record("normal_models", "1").await.unwrap();
        assert_eq!(hit.len(), 2);

        let miss = svc.logs_for_record("normal_models", "2").await.unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn logs_for_entity_resolves_table_via_registry() {
        let svc = test_service().await;
        seed(&svc).await;

        let by_entity = svc.logs_for_entity("normal_model", "1").await.unwrap();
        let by_table = svc.logs_for_record("normal_models", "1").await.unwrap();
        assert_eq!(by_entity, by_table);
    }

    #[tokio::test]
    async fn unknown_entity_returns_empty_not_error() {
        let svc = test_service().await;
        seed(&svc).await;

        let logs = svc.logs_for_entity("never_registered", "1").await.unwrap();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let svc = test_service().await;
        seed(&svc).await;

        let first = svc.logs_for_table("normal_models").await.unwrap();
        let second = svc.logs_for_table("normal_models").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn details_come_back_with_headers() {
        let svc = test_service().await;
        seed(&svc).await;

        let logs = svc.logs_for_entity("normal_model", "1").await.unwrap();
        let modified = &logs[1];
        assert_eq!(modified.details.len(), 1);
        assert_eq!(modified.details[0].property_name, "description");
        assert_eq!(modified.details[0].original_value.as_deref(), Some("X"));
        assert_eq!(modified.details[0].new_value.as_deref(), Some("Y"));
        assert!(modified.details[0].id > 0);
    }
}
