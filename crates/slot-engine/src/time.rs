//! Narrow date/time helpers shared by the pipeline stages.
//!
//! Every instant in this crate is a `DateTime<FixedOffset>`: the wall clock the
//! instant was observed in is kept alongside it, which the renderer relies on.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Weekday};

use crate::error::{Result, SlotError};

/// Layout used for slot labels, e.g. `2024-01-08 09:30`.
pub const SLOT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse an ISO-8601 timestamp carrying a UTC offset.
///
/// Accepts RFC 3339 (`2024-01-08T09:00:00+01:00`, `2024-01-08T08:00:00Z`) and
/// the colon-less offset form (`2024-01-08T09:00:00+0100`).
///
/// # Errors
/// Returns `SlotError::InvalidDate` if the string matches neither form.
pub fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = s.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z"))
        .map_err(|e| SlotError::InvalidDate(format!("{trimmed:?}: {e}")))
}

/// Format an instant with minute precision in its own offset.
pub fn format_instant(dt: &DateTime<FixedOffset>) -> String {
    dt.format(SLOT_FORMAT).to_string()
}

pub fn add_minutes(dt: DateTime<FixedOffset>, minutes: i64) -> DateTime<FixedOffset> {
    dt + Duration::minutes(minutes)
}

/// Weekday of the instant's calendar date, as seen in its own offset.
pub fn weekday_of(dt: &DateTime<FixedOffset>) -> Weekday {
    dt.weekday()
}
