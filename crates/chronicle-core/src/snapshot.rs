//! Entity snapshots: point-in-time column values.
//!
//! The persistence collaborator captures two snapshots per pending change —
//! the original-values view and the current values — as plain field →
//! `serde_json::Value` maps. Only column-level values belong here: owning
//! foreign-key columns yes, inverse collection sides no.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::TrackingError;

/// Ordered field → value map for one side of a change.
///
/// Backed by a `BTreeMap`, so iteration (and therefore diff output) is in
/// field-name order — deterministic across runs and machines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    values: BTreeMap<String, serde_json::Value>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, chaining.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.values.get(field)
    }

    /// Field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Render a snapshot value to its stable, culture-invariant string form.
///
/// `Null` renders as `None` (SQL NULL), never as the string `"null"` — a
/// null-to-empty-string transition must remain observable as a change.
///
/// # Errors
///
/// Returns `TrackingError::UnsupportedValue` for arrays and objects; those
/// are not column values and stringifying them would produce
/// locale-independent but schema-dependent noise.
pub fn render_value(
    entity: &str,
    field: &str,
    value: &serde_json::Value,
) -> Result<Option<String>, TrackingError> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s.clone())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Array(_) => Err(TrackingError::UnsupportedValue {
            entity: entity.to_string(),
            field: field.to_string(),
            kind: "array",
        }),
        serde_json::Value::Object(_) => Err(TrackingError::UnsupportedValue {
            entity: entity.to_string(),
            field: field.to_string(),
            kind: "object",
        }),
    }
}

/// Truthiness test for soft-delete flags: `true`, any non-zero number, or
/// the strings `"true"`/`"1"`.
#[must_use]
pub fn is_truthy(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(serde_json::Value::String(s)) => s == "true" || s == "1",
        _ => false,
    }
}
