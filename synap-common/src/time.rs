//! Timestamp utilities
//!
//! SQLite `CURRENT_TIMESTAMP` produces `YYYY-MM-DD HH:MM:SS` in UTC; timestamps
//! written from Rust use the same layout so string comparison orders them.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offsets are clamped to a century so the result keeps a four-digit year
const MAX_OFFSET_HOURS: i64 = 24 * 365 * 100;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp the way SQLite's CURRENT_TIMESTAMP does
pub fn to_sqlite(ts: DateTime<Utc>) -> String {
    ts.format(SQLITE_FORMAT).to_string()
}

/// Current time plus `hours`, in SQLite layout
pub fn hours_from_now(hours: i64) -> String {
    let hours = hours.clamp(-MAX_OFFSET_HOURS, MAX_OFFSET_HOURS);
    to_sqlite(now() + Duration::hours(hours))
}

/// Parse a SQLite timestamp; `None` for anything unexpected
pub fn parse_sqlite(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, SQLITE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Short human date (`Jan 05, 2026`), falling back to the raw value
pub fn display_date(raw: &str) -> String {
    parse_sqlite(raw)
        .map(|ts| ts.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}
