//! Row-to-entity parsing helpers.
//!
//! Convert `libsql::Row` (column-indexed) into typed structs. Handles the
//! dual datetime format issue (`SQLite`'s `datetime('now')` vs Rust's
//! `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s
/// default format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either
/// format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all chronicle-core enums that use
/// `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum
/// variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty
/// string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_core::enums::EventType;

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert!(parse_datetime("not a date").is_err());
    }

    #[test]
    fn parses_event_type_from_storage_form() {
        let parsed: EventType = parse_enum("soft_deleted").unwrap();
        assert_eq!(parsed, EventType::SoftDeleted);
        assert!(parse_enum::<EventType>("nope").is_err());
    }
}
