//! Whole-hour UTC offsets for the viewer and extra display columns.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Largest magnitude in use anywhere (UTC+14, Line Islands).
const MAX_OFFSET_HOURS: i32 = 14;

/// A signed whole number of hours east of UTC.
///
/// Parses from `+1`, `-5`, `5`, `+05` or `UTC+1`; displays as `UTC+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcOffset {
    hours: i32,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset { hours: 0 };

    /// # Errors
    /// Returns `SlotError::InvalidOffset` if `hours` is outside `-14..=14`.
    pub fn from_hours(hours: i32) -> Result<Self> {
        if hours.abs() > MAX_OFFSET_HOURS {
            return Err(SlotError::InvalidOffset(format!(
                "{hours} hours is outside -{MAX_OFFSET_HOURS}..=+{MAX_OFFSET_HOURS}"
            )));
        }
        Ok(Self { hours })
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn sign(&self) -> char {
        if self.hours < 0 {
            '-'
        } else {
            '+'
        }
    }

    /// The offset as chrono understands it.
    pub fn fixed(&self) -> FixedOffset {
        // Magnitude is bounded by MAX_OFFSET_HOURS, well inside chrono's ±24h.
        FixedOffset::east_opt(self.hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// ISO-8601 suffix such as `+0100`, as used in free/busy request bounds.
    pub fn iso_suffix(&self) -> String {
        format!("{}{:02}00", self.sign(), self.hours.abs())
    }

    /// Parse a comma-separated list, skipping empty entries.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidOffset` on the first malformed entry.
    pub fn parse_list(raw: &str) -> Result<Vec<UtcOffset>> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<UtcOffset>)
            .collect()
    }
}

impl FromStr for UtcOffset {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidOffset(format!("{s:?} (expected e.g. +1, -5 or UTC+2)"));

        let mut rest = s.trim();
        if rest.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("utc")) {
            rest = &rest[3..];
        }

        let (negative, digits) = match rest.as_bytes().first().copied() {
            Some(b'+') => (false, &rest[1..]),
            Some(b'-') => (true, &rest[1..]),
            Some(_) => (false, rest),
            None => return Err(invalid()),
        };

        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let magnitude: i32 = digits.parse().map_err(|_| invalid())?;
        UtcOffset::from_hours(if negative { -magnitude } else { magnitude })
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UTC{}{}", self.sign(), self.hours.abs())
    }
}

impl TryFrom<String> for UtcOffset {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<UtcOffset> for String {
    fn from(value: UtcOffset) -> Self {
        value.to_string()
    }
}
