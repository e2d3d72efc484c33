//! Record-id formatting for single and composite primary keys.

use crate::errors::TrackingError;
use crate::registry::EntityDescriptor;
use crate::snapshot::{Snapshot, render_value};

/// Render an entity's primary key to its canonical string identifier.
///
/// Single key: the value's plain string form. Composite key: `[v1,v2,...]`
/// in the descriptor's declared key order, regardless of snapshot field
/// order. The result is stable for equality comparison; it is not meant to
/// be parsed back into typed values.
///
/// # Errors
///
/// Returns `TrackingError::MissingKey` when any key field is absent from
/// the snapshot or renders to NULL, and `TrackingError::UnsupportedValue`
/// when a key value has no string form.
pub fn record_id(desc: &EntityDescriptor, snapshot: &Snapshot) -> Result<String, TrackingError> {
    let mut parts = Vec::with_capacity(desc.key_fields().len());
    for field in desc.key_fields() {
        let missing = || TrackingError::MissingKey {
            entity: desc.entity().to_string(),
            field: field.clone(),
        };
        let value = snapshot.get(field).ok_or_else(missing)?;
        let rendered = render_value(desc.entity(), field, value)?.ok_or_else(missing)?;
        parts.push(rendered);
    }

    if parts.len() == 1 {
        Ok(parts.swap_remove(0))
    } else {
        Ok(format!("[{}]", parts.join(",")))
    }
}
