//! Event type enum for Chronicle audit logs.
//!
//! Serialized `snake_case` via `#[serde(rename_all = "snake_case")]`; the
//! `as_str()` form is what gets stored in the `event_type` TEXT column.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of change an audit log records.
///
/// `Added`, `Modified`, and `Deleted` come straight from the persistence
/// layer's change classification. `SoftDeleted` is produced by the commit
/// coordinator when a descriptor-declared soft-delete flag transitions from
/// falsy to truthy on an otherwise `Modified` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Added,
    Modified,
    Deleted,
    SoftDeleted,
}

impl EventType {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::SoftDeleted => "soft_deleted",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_roundtrip() {
        for event in [
            EventType::Added,
            EventType::Modified,
            EventType::Deleted,
            EventType::SoftDeleted,
        ] {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.as_str()));
            let recovered: EventType = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, event);
        }
    }
}
