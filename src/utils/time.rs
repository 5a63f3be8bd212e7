//! Timestamp parsing and display helpers.
//!
//! The backend emits ISO-8601 timestamps, usually without an offset
//! (`2024-03-01T12:00:00.123456`). Those are the backend's local wall
//! clock, so offset-less values are read in the viewer's offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a backend timestamp. Values without an offset are wall-clock
/// time in `offset`. Returns `None` for anything unrecognised.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Date and time in the viewer's offset, e.g. `2024-03-01 13:00:00`.
pub fn format_datetime(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Date only in the viewer's offset, e.g. `2024-03-01`.
pub fn format_date(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%Y-%m-%d").to_string()
}

/// Format a raw timestamp for display, passing unparseable input through.
pub fn display_datetime(raw: &str, offset: &FixedOffset) -> String {
    match parse_timestamp(raw, offset) {
        Some(at) => format_datetime(at, offset),
        None => raw.to_string(),
    }
}

/// The offset of the local timezone right now.
pub fn local_offset() -> FixedOffset {
    *chrono::Local::now().offset()
}
