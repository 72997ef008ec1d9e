//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a timestamp to epoch milliseconds
pub fn epoch_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Convert an optional timestamp to epoch milliseconds, treating a missing
/// value as 0 (the epoch). Used when ordering rows whose timestamp column
/// may be unset.
pub fn epoch_millis_or_zero(ts: Option<DateTime<Utc>>) -> i64 {
    ts.map(|t| t.timestamp_millis()).unwrap_or(0)
}
