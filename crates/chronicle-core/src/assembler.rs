//! Audit log assembler.
//!
//! Builds one `AuditLog` (header plus details) from a single entity-change
//! event. Pure and non-suspending: the same function backs both the async
//! and the blocking save entry points.

use chrono::{DateTime, Utc};

use crate::diff;
use crate::entities::AuditLog;
use crate::enums::EventType;
use crate::errors::TrackingError;
use crate::identity::UserRef;
use crate::key;
use crate::registry::EntityDescriptor;
use crate::snapshot::Snapshot;

/// Assemble the audit log for one change.
///
/// The tracking-disabled gate lives in the commit coordinator (registry
/// lookup); by the time a descriptor reaches here, the entity is audited.
/// Key values resolve from `current`, except for `Deleted` where only
/// `prior` still carries them. `now` is the commit-batch instant: every log
/// in one save shares it.
///
/// # Errors
///
/// Propagates `TrackingError` from key resolution and diffing; any error
/// aborts the whole save before the transaction opens.
pub fn assemble(
    desc: &EntityDescriptor,
    kind: EventType,
    user: Option<&UserRef>,
    prior: &Snapshot,
    current: &Snapshot,
    now: DateTime<Utc>,
) -> Result<AuditLog, TrackingError> {
    let key_source = if kind == EventType::Deleted {
        prior
    } else {
        current
    };
    let record_id = key::record_id(desc, key_source)?;
    let details = diff::diff(desc, kind, prior, current)?;

    Ok(AuditLog {
        id: 0,
        table_name: desc.table_name().to_string(),
        record_id,
        event_type: kind,
        user_name: user.map(UserRef::as_user_name),
        event_date_utc: now,
        details,
    })
}
