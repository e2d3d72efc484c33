//! Error types for metadata resolution and diff computation.
//!
//! These are the only failures the pure pipeline can produce. Persistence
//! errors are defined in `chronicle-db` and wrap this type, so callers of
//! `save_changes` see a single failure class whether the audit pipeline or
//! the data write failed.

use thiserror::Error;

/// Errors raised while resolving tracking metadata or computing diffs.
///
/// Any of these aborts the entire save operation; the engine never writes a
/// partial audit trail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// A descriptor was registered without any primary-key fields.
    #[error("Entity '{entity}' declares no primary-key fields")]
    NoKeyFields { entity: String },

    /// The same entity name was registered twice.
    #[error("Entity '{entity}' is registered more than once")]
    DuplicateEntity { entity: String },

    /// Tracking is enabled but a primary-key value is absent or null in the
    /// snapshot the key resolves from.
    #[error("Missing primary-key value {entity}.{field}")]
    MissingKey { entity: String, field: String },

    /// A field value has no stable string form (arrays and objects are not
    /// diffable column values).
    #[error("Unsupported {kind} value for {entity}.{field}")]
    UnsupportedValue {
        entity: String,
        field: String,
        kind: &'static str,
    },
}
