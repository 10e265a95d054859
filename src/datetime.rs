//! Date/time utilities for Stack Breeze.
//!
//! Timestamps are stored as UTC text in `YYYY-MM-DD HH:MM:SS` form so that
//! the same statements work on SQLite and PostgreSQL.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage format for timestamps.
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a UTC datetime for storage.
pub fn to_db(dt: &DateTime<Utc>) -> String {
    dt.format(DB_FORMAT).to_string()
}

/// Current time in storage format.
pub fn now_db() -> String {
    to_db(&Utc::now())
}

/// Current time as milliseconds since the Unix epoch.
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a stored timestamp to RFC3339 (e.g. `2024-01-15T10:30:00Z`).
///
/// Values that are not in storage format are returned unchanged.
pub fn to_rfc3339(datetime_str: &str) -> String {
    match NaiveDateTime::parse_from_str(datetime_str, DB_FORMAT) {
        Ok(naive) => naive.and_utc().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        Err(_) => datetime_str.to_string(),
    }
}

/// Convert an optional stored timestamp to RFC3339.
pub fn to_rfc3339_opt(datetime_str: Option<&str>) -> Option<String> {
    datetime_str.map(to_rfc3339)
}

/// Serde helper: serialize a stored timestamp as RFC3339.
pub fn serialize_rfc3339<S: serde::Serializer>(
    value: &str,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_rfc3339(value))
}

/// Serde helper: serialize an optional stored timestamp as RFC3339.
pub fn serialize_rfc3339_opt<S: serde::Serializer>(
    value: &Option<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&to_rfc3339(v)),
        None => serializer.serialize_none(),
    }
}
