//! Property diff engine.
//!
//! Compares the pre-change and post-change snapshots of one entity and
//! produces the ordered list of per-property change records. Pure CPU work:
//! the commit coordinator runs this synchronously before any transaction
//! opens, so a diff failure aborts the save with nothing written.

use std::collections::BTreeSet;

use crate::entities::AuditLogDetail;
use crate::enums::EventType;
use crate::errors::TrackingError;
use crate::registry::EntityDescriptor;
use crate::snapshot::{Snapshot, render_value};

/// Compute the change records for one entity change.
///
/// - `Added`: one detail per trackable field of `current` (key fields
///   included, so the generated identifier is itself auditable), with
///   `original_value: None`.
/// - `Deleted`: one detail per trackable field of `prior`, with
///   `new_value: None`.
/// - `Modified` / `SoftDeleted`: a detail for every trackable field whose
///   rendered value differs between `prior` and `current`. NULL vs empty
///   string is a change; two NULLs never emit.
///
/// Excluded fields are filtered in every branch. An entity with zero
/// trackable fields yields an empty list (the header may still be emitted).
///
/// # Errors
///
/// Returns `TrackingError::UnsupportedValue` when any examined value has no
/// stable string form.
pub fn diff(
    desc: &EntityDescriptor,
    kind: EventType,
    prior: &Snapshot,
    current: &Snapshot,
) -> Result<Vec<AuditLogDetail>, TrackingError> {
    match kind {
        EventType::Added => one_sided(desc, current, Side::New),
        EventType::Deleted => one_sided(desc, prior, Side::Original),
        EventType::Modified | EventType::SoftDeleted => changed(desc, prior, current),
    }
}

enum Side {
    Original,
    New,
}

fn one_sided(
    desc: &EntityDescriptor,
    snapshot: &Snapshot,
    side: Side,
) -> Result<Vec<AuditLogDetail>, TrackingError> {
    let mut details = Vec::new();
    for field in snapshot.fields() {
        if desc.is_excluded(field) {
            continue;
        }
        let value = snapshot
            .get(field)
            .map(|v| render_value(desc.entity(), field, v))
            .transpose()?
            .flatten();
        let (original_value, new_value) = match side {
            Side::Original => (value, None),
            Side::New => (None, value),
        };
        details.push(detail(desc, field, original_value, new_value));
    }
    Ok(details)
}

fn changed(
    desc: &EntityDescriptor,
    prior: &Snapshot,
    current: &Snapshot,
) -> Result<Vec<AuditLogDetail>, TrackingError> {
    let fields: BTreeSet<&str> = prior.fields().chain(current.fields()).collect();

    let mut details = Vec::new();
    for field in fields {
        if desc.is_excluded(field) {
            continue;
        }
        let before = rendered(desc, field, prior)?;
        let after = rendered(desc, field, current)?;
        if before == after {
            continue;
        }
        details.push(detail(desc, field, before, after));
    }
    Ok(details)
}

/// Rendered value for a field, treating an absent field the same as NULL.
fn rendered(
    desc: &EntityDescriptor,
    field: &str,
    snapshot: &Snapshot,
) -> Result<Option<String>, TrackingError> {
    Ok(snapshot
        .get(field)
        .map(|v| render_value(desc.entity(), field, v))
        .transpose()?
        .flatten())
}

fn detail(
    desc: &EntityDescriptor,
    field: &str,
    original_value: Option<String>,
    new_value: Option<String>,
) -> AuditLogDetail {
    AuditLogDetail {
        id: 0,
        property_name: field.to_string(),
        column_name: desc.column_for(field).map(str::to_string),
        original_value,
        new_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn desc() -> EntityDescriptor {
        EntityDescriptor::new("normal_model", ["id"])
    }

    #[test]
    fn added_emits_all_fields_with_null_originals() {
        let current = Snapshot::new().set("id", 1).set("description", "X");
        let details = diff(&desc(), EventType::Added, &Snapshot::new(), &current).unwrap();

        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.original_value.is_none()));
        assert!(
            details
                .iter()
                .any(|d| d.property_name == "id" && d.new_value.as_deref() == Some("1"))
        );
        assert!(
            details
                .iter()
                .any(|d| d.property_name == "description" && d.new_value.as_deref() == Some("X"))
        );
    }

    #[test]
    fn deleted_emits_all_fields_with_null_new_values() {
        let prior = Snapshot::new().set("id", 1).set("description", "Y");
        let details = diff(&desc(), EventType::Deleted, &prior, &Snapshot::new()).unwrap();

        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.new_value.is_none()));
        assert!(
            details
                .iter()
                .any(|d| d.property_name == "description"
                    && d.original_value.as_deref() == Some("Y"))
        );
    }

    #[test]
    fn modified_emits_only_changed_fields() {
        let prior = Snapshot::new().set("id", 1).set("description", "X");
        let current = Snapshot::new().set("id", 1).set("description", "Y");
        let details = diff(&desc(), EventType::Modified, &prior, &current).unwrap();

        assert_eq!(
            details,
            vec![AuditLogDetail {
                id: 0,
                property_name: "description".to_string(),
                column_name: None,
                original_value: Some("X".to_string()),
                new_value: Some("Y".to_string()),
            }]
        );
    }

    #[test]
    fn unchanged_foreign_key_does_not_appear() {
        let d = EntityDescriptor::new("child_model", ["id"]);
        let prior = Snapshot::new()
            .set("id", 3)
            .set("parent_id", 1)
            .set("label", "a");
        let current = Snapshot::new()
            .set("id", 3)
            .set("parent_id", 1)
            .set("label", "b");
        let details = diff(&d, EventType::Modified, &prior, &current).unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].property_name, "label");
    }

    #[test]
    fn null_to_empty_string_is_a_change() {
        let prior = Snapshot::new().set("id", 1).set("description", json!(null));
        let current = Snapshot::new().set("id", 1).set("description", "");
        let details = diff(&desc(), EventType::Modified, &prior, &current).unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].original_value, None);
        assert_eq!(details[0].new_value.as_deref(), Some(""));
    }

    #[test]
    fn two_nulls_never_emit() {
        let prior = Snapshot::new().set("id", 1).set("description", json!(null));
        let current = Snapshot::new().set("id", 1).set("description", json!(null));
        let details = diff(&desc(), EventType::Modified, &prior, &current).unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn absent_field_treated_as_null() {
        let prior = Snapshot::new().set("id", 1);
        let current = Snapshot::new().set("id", 1).set("description", json!(null));
        let details = diff(&desc(), EventType::Modified, &prior, &current).unwrap();
        assert!(details.is_empty());
    }

    #[test]
    fn excluded_fields_are_filtered_everywhere() {
        let d = EntityDescriptor::new("normal_model", ["id"]).exclude("secret");
        let prior = Snapshot::new().set("id", 1).set("secret", "old");
        let current = Snapshot::new().set("id", 1).set("secret", "new");

        assert!(
            diff(&d, EventType::Modified, &prior, &current)
                .unwrap()
                .is_empty()
        );
        let added = diff(&d, EventType::Added, &Snapshot::new(), &current).unwrap();
        assert!(added.iter().all(|detail| detail.property_name != "secret"));
    }

    #[test]
    fn column_override_lands_on_detail() {
        let d = EntityDescriptor::new("child_model", ["id"]).column_name("parent", "parent_id");
        let prior = Snapshot::new().set("id", 3).set("parent", 1);
        let current = Snapshot::new().set("id", 3).set("parent", 2);
        let details = diff(&d, EventType::Modified, &prior, &current).unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].property_name, "parent");
        assert_eq!(details[0].column_name.as_deref(), Some("parent_id"));
        assert_eq!(details[0].original_value.as_deref(), Some("1"));
        assert_eq!(details[0].new_value.as_deref(), Some("2"));
    }

    #[test]
    fn soft_deleted_uses_modified_semantics() {
        let d = EntityDescriptor::new("soft_model", ["id"]).soft_delete("is_deleted");
        let prior = Snapshot::new().set("id", 1).set("is_deleted", false);
        let current = Snapshot::new().set("id", 1).set("is_deleted", true);
        let details = diff(&d, EventType::SoftDeleted, &prior, &current).unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].property_name, "is_deleted");
        assert_eq!(details[0].original_value.as_deref(), Some("false"));
        assert_eq!(details[0].new_value.as_deref(), Some("true"));
    }

    #[test]
    fn unsupported_value_aborts() {
        let prior = Snapshot::new().set("id", 1).set("tags", json!(["a"]));
        let current = Snapshot::new().set("id", 1).set("tags", json!(["a", "b"]));
        assert!(matches!(
            diff(&desc(), EventType::Modified, &prior, &current),
            Err(TrackingError::UnsupportedValue { .. })
        ));
    }
}
