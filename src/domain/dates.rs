//! Parsing of the date and timestamp strings stored by the backend.
//!
//! Columns hold either a bare date (`2024-03-15`) or an RFC 3339 timestamp
//! (`2024-03-15T09:30:00.000Z`, `2024-03-15T09:30:00+00:00`). Calendar
//! comparisons happen in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parse a stored date or timestamp into a UTC instant.
///
/// A bare date is midnight UTC of that day.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    // PostgREST renders timestamptz with a space separator in some setups.
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Calendar day (UTC) of a stored date or timestamp.
pub fn calendar_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|ts| ts.date_naive())
}

/// `YYYY-MM-DD` rendering for exports; unparsable values pass through.
pub fn format_date(value: &str) -> String {
    calendar_date(value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}
