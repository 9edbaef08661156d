//! Slot width validation.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Width of a grid slot, in whole minutes that divide an hour evenly.
///
/// Valid widths: 1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30 and 60 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Granularity {
    minutes: u32,
}

impl Granularity {
    /// Half an hour, the default.
    pub const HALF_HOUR: Granularity = Granularity { minutes: 30 };

    /// Build from a fraction of an hour (`0.5` → 30 minutes).
    ///
    /// # Errors
    /// Returns `SlotError::InvalidGranularity` unless `hours * 60` is a whole
    /// number of minutes that divides 60.
    pub fn from_hours(hours: f64) -> Result<Self> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(SlotError::InvalidGranularity(format!(
                "{hours}h must be a positive fraction of an hour"
            )));
        }

        let minutes = hours * 60.0;
        let rounded = minutes.round();
        // 1e-9 absorbs binary noise such as 0.1 * 60 = 6.000000000000001.
        if (minutes - rounded).abs() > 1e-9 || rounded > 60.0 {
            return Err(SlotError::InvalidGranularity(format!(
                "{hours}h is not a whole number of minutes dividing 60"
            )));
        }

        Self::from_minutes(rounded as u32)
    }

    /// # Errors
    /// Returns `SlotError::InvalidGranularity` unless `minutes` divides 60.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes == 0 || 60 % minutes != 0 {
            return Err(SlotError::InvalidGranularity(format!(
                "{minutes} min does not divide 60 evenly"
            )));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> i64 {
        i64::from(self.minutes) * 60
    }

    pub fn hours(&self) -> f64 {
        f64::from(self.minutes) / 60.0
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// Number of consecutive grid points a busy period of `duration` covers:
    /// `ceil(seconds / width_seconds)`. Non-positive durations cover nothing.
    pub fn slots_covering(&self, duration: Duration) -> u64 {
        let secs = duration.num_seconds();
        if secs <= 0 {
            return 0;
        }
        (secs as u64).div_ceil(self.seconds() as u64)
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::HALF_HOUR
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

impl TryFrom<f64> for Granularity {
    type Error = SlotError;

    fn try_from(hours: f64) -> Result<Self> {
        Self::from_hours(hours)
    }
}

impl From<Granularity> for f64 {
    fn from(value: Granularity) -> Self {
        value.hours()
    }
}
