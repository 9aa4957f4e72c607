//! Utility functions for parsing time/date/offset strings into chrono types.

use super::error::TimeError;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])(\d{1,2}):(\d{2})$").expect("offset pattern is valid")
});

/// Parses a naive datetime string as written by exiftool (YYYY:MM:DD HH:MM:SS[.fff]).
pub fn parse_exif_naive(s: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];

    let s = s.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parses an offset-aware ISO-8601 timestamp from a location-history record.
///
/// Accepts RFC 3339 (`2024-01-01T09:00:00.000+02:00`, `...Z`) as well as the
/// compact offset form (`2024-01-01T09:00:00.000+0200`).
pub fn parse_history_timestamp(s: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| TimeError::InvalidTimestamp(s.to_string()))
}

/// Parses an offset string like "+02:00", "-05:30" or "Z" into signed seconds east of UTC.
///
/// Compact offsets ("+0200") must be normalized first, see [`super::normalize_offset`].
pub fn parse_offset_string(offset_str: &str) -> Result<i32, TimeError> {
    if offset_str == "Z" {
        return Ok(0);
    }
    let invalid = || TimeError::InvalidOffset(offset_str.to_string());

    let caps = OFFSET_RE.captures(offset_str).ok_or_else(invalid)?;
    let sign = if &caps[1] == "-" { -1 } else { 1 };
    let hours = caps[2].parse::<i32>().map_err(|_| invalid())?;
    let minutes = caps[3].parse::<i32>().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }
    Ok(sign * (hours * 3600 + minutes * 60))
}
