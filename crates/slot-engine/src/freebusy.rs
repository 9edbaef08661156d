//! Free/busy data exchanged with the calendar provider.
//!
//! The provider itself (authentication, HTTP) sits behind [`FreeBusySource`].
//! This module owns the request body we would send and the parsed busy data we
//! get back, in the shape of the Google Calendar `freebusy.query` API:
//!
//! ```json
//! {"calendars": {"alice@example.com": {"busy": [{"start": "...", "end": "..."}]}}}
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::offset::UtcOffset;
use crate::time;

/// A half-open `[start, end)` period during which a person is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusyInterval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl BusyInterval {
    /// # Errors
    /// Returns `SlotError::QueryFailure` unless `start < end`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<Self> {
        if start >= end {
            return Err(SlotError::QueryFailure(format!(
                "busy interval {start} .. {end} does not end after it starts"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from ISO-8601 strings.
    ///
    /// # Errors
    /// Returns `SlotError::QueryFailure` if either bound is malformed or the
    /// interval is empty.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = time::parse_instant(start).map_err(|e| SlotError::QueryFailure(e.to_string()))?;
        let end = time::parse_instant(end).map_err(|e| SlotError::QueryFailure(e.to_string()))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Busy intervals for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonBusy {
    pub person: String,
    pub busy: Vec<BusyInterval>,
}

/// Busy intervals per person, in the order the provider listed them.
pub type BusyMap = Vec<PersonBusy>;

// ── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
}

/// Body of a free/busy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyQuery {
    pub time_min: String,
    pub time_max: String,
    pub time_zone: String,
    pub items: Vec<CalendarItem>,
}

impl FreeBusyQuery {
    /// Build the request covering `start_date` at `day_start` through
    /// `end_date` at `day_end`, both in the viewer's offset.
    ///
    /// Identifiers without an `@` get `@{domain}` appended when a domain is given.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        day_start: NaiveTime,
        day_end: NaiveTime,
        viewer: UtcOffset,
        people: &[String],
        domain: Option<&str>,
    ) -> Self {
        let bound = |date: NaiveDate, t: NaiveTime| {
            format!("{}T{}{}", date.format("%Y-%m-%d"), t.format("%H:%M:%S"), viewer.iso_suffix())
        };

        let items = people
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| CalendarItem {
                id: qualify_person(p, domain),
            })
            .collect();

        Self {
            time_min: bound(start_date, day_start),
            time_max: bound(end_date, day_end),
            time_zone: viewer.to_string(),
            items,
        }
    }
}

/// Append `@domain` to bare identifiers.
pub fn qualify_person(person: &str, domain: Option<&str>) -> String {
    match domain {
        Some(domain) if !person.contains('@') && !domain.is_empty() => {
            format!("{}@{}", person, domain.trim_start_matches('@'))
        }
        _ => person.to_string(),
    }
}

// ── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    calendars: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    #[serde(default)]
    busy: Vec<RawBusy>,
    #[serde(default)]
    errors: Vec<RawCalendarError>,
}

#[derive(Debug, Deserialize)]
struct RawBusy {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct RawCalendarError {
    #[serde(default)]
    domain: String,
    #[serde(default)]
    reason: String,
}

/// Parse a free/busy response document into a [`BusyMap`].
///
/// Calendar order follows the document. A calendar that reports errors (e.g.
/// `notFound`) fails the whole query rather than silently looking free.
///
/// # Errors
/// Returns `SlotError::QueryFailure` for invalid JSON, malformed timestamps,
/// empty intervals, or per-calendar errors.
pub fn parse_response(json: &str) -> Result<BusyMap> {
    let raw: RawResponse = serde_json::from_str(json)
        .map_err(|e| SlotError::QueryFailure(format!("malformed free/busy response: {e}")))?;

    let mut map = Vec::with_capacity(raw.calendars.len());
    for (person, value) in raw.calendars {
        let calendar: RawCalendar = serde_json::from_value(value).map_err(|e| {
            SlotError::QueryFailure(format!("malformed calendar entry for {person}: {e}"))
        })?;

        if let Some(err) = calendar.errors.first() {
            return Err(SlotError::QueryFailure(format!(
                "calendar {person} reported an error: {} ({})",
                err.reason, err.domain
            )));
        }

        let busy = calendar
            .busy
            .iter()
            .map(|b| BusyInterval::parse(&b.start, &b.end))
            .collect::<Result<Vec<_>>>()?;

        map.push(PersonBusy { person, busy });
    }

    Ok(map)
}

// ── Sources ─────────────────────────────────────────────────────────────────

/// Something that can answer a free/busy query.
///
/// The call is blocking and all-or-nothing: an `Err` aborts the run.
pub trait FreeBusySource {
    fn query(&self, query: &FreeBusyQuery) -> Result<BusyMap>;
}

/// A free/busy response captured ahead of time, e.g. saved from the provider.
#[derive(Debug, Clone)]
pub enum RecordedResponse {
    File(PathBuf),
    Stdin,
    Inline(String),
}

impl RecordedResponse {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    fn read(&self) -> Result<String> {
        match self {
            Self::File(path) => std::fs::read_to_string(path).map_err(|e| {
                SlotError::QueryFailure(format!("cannot read {}: {e}", path.display()))
            }),
            Self::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| SlotError::QueryFailure(format!("cannot read stdin: {e}")))?;
                Ok(buf)
            }
            Self::Inline(json) => Ok(json.clone()),
        }
    }
}

impl FreeBusySource for RecordedResponse {
    fn query(&self, query: &FreeBusyQuery) -> Result<BusyMap> {
        tracing::debug!(
            time_min = %query.time_min,
            time_max = %query.time_max,
            people = query.items.len(),
            "answering free/busy query from recorded response"
        );
        let map = parse_response(&self.read()?)?;

        for item in &query.items {
            if !map.iter().any(|p| p.person == item.id) {
                tracing::warn!(person = %item.id, "no free/busy data for requested person");
            }
        }
        Ok(map)
    }
}
