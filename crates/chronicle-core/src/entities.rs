//! Audit log entities.
//!
//! `AuditLog` and `AuditLogDetail` map to the `audit_log` and
//! `audit_log_detail` tables in the libSQL database. Both are append-only:
//! created once inside the commit coordinator's pre-commit phase and never
//! updated or deleted afterwards.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EventType;

/// One audit log header: a single entity change observed at commit time.
///
/// `record_id` is the canonical key string produced by [`crate::key`] —
/// a plain value for single-key entities, `[k1,k2]` for composite keys.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditLog {
    /// Database-assigned sequence id. `0` until the row is persisted.
    pub id: i64,
    pub table_name: String,
    pub record_id: String,
    pub event_type: EventType,
    /// Who performed the change. `None` when the save was anonymous.
    pub user_name: Option<String>,
    /// Always UTC; shared by every log in the same commit batch.
    pub event_date_utc: DateTime<Utc>,
    /// Per-property diffs, in field-name order.
    pub details: Vec<AuditLogDetail>,
}

/// A single property-level before/after pair on an [`AuditLog`].
///
/// Invariants: `Added` logs carry `original_value: None`, `Deleted` logs
/// carry `new_value: None`, and `Modified` details always differ (no-op
/// diffs are never emitted).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditLogDetail {
    /// Database-assigned sequence id. `0` until persisted.
    pub id: i64,
    /// Field name as supplied in the entity snapshot.
    pub property_name: String,
    /// Storage column name when it differs from `property_name` (foreign-key
    /// backing columns). `None` means the two are the same.
    pub column_name: Option<String>,
    pub original_value: Option<String>,
    pub new_value: Option<String>,
}
