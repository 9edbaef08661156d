//! Candidate slot grid generation.
//!
//! A grid is every `granularity`-spaced start instant inside the daily working
//! window, for each calendar day between the start and end dates (inclusive),
//! anchored in the viewer's UTC offset. The resulting [`FreeList`] is the value
//! that later pipeline stages shrink and render.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::granularity::Granularity;
use crate::offset::UtcOffset;
use crate::time;

/// A candidate meeting start on the grid, with minute precision.
///
/// Ordering and equality compare the underlying instant, so two slots written
/// in different offsets but naming the same moment are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    start: DateTime<FixedOffset>,
}

impl Slot {
    /// Wrap an instant, discarding seconds and sub-second precision.
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        let start = start
            - Duration::seconds(i64::from(start.second()))
            - Duration::nanoseconds(i64::from(start.nanosecond()));
        Self { start }
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// The same instant seen from another offset.
    pub fn in_offset(&self, offset: UtcOffset) -> DateTime<FixedOffset> {
        self.start.with_timezone(&offset.fixed())
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&time::format_instant(&self.start))
    }
}

/// Daily window in which candidate slots are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Also emit a slot starting exactly at `end`.
    #[serde(default)]
    pub include_end: bool,
}

impl WorkingHours {
    /// # Errors
    /// Returns `SlotError::InvalidWorkingHours` unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let hours = Self {
            start,
            end,
            include_end: false,
        };
        hours.validate()?;
        Ok(hours)
    }

    pub fn with_inclusive_end(mut self, include_end: bool) -> Self {
        self.include_end = include_end;
        self
    }

    /// # Errors
    /// Returns `SlotError::InvalidWorkingHours` unless `start < end`.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(SlotError::InvalidWorkingHours(format!(
                "window start {} must be before window end {}",
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )));
        }
        Ok(())
    }

    /// How many grid points one day of this window holds.
    pub fn slots_per_day(&self, granularity: Granularity) -> usize {
        let width = (self.end - self.start).num_seconds();
        let step = granularity.seconds();
        let mut count = width / step;
        if width % step != 0 || self.include_end {
            count += 1;
        }
        usize::try_from(count).unwrap_or(0)
    }

    fn contains(&self, t: NaiveTime) -> bool {
        t < self.end || (self.include_end && t == self.end)
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN),
            include_end: false,
        }
    }
}

/// Everything needed to lay out a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: WorkingHours,
    pub granularity: Granularity,
    /// Offset the working window is expressed in.
    pub anchor: UtcOffset,
}

/// The ordered set of slots still open for a meeting.
///
/// Starts as the full grid and only ever shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeList {
    slots: Vec<Slot>,
    granularity: Granularity,
    anchor: UtcOffset,
}

impl FreeList {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn anchor(&self) -> UtcOffset {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// Slots starting in `[from, to)`.
    pub fn range(&self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> &[Slot] {
        let lo = self.slots.partition_point(|s| s.start < from);
        let hi = self.slots.partition_point(|s| s.start < to);
        &self.slots[lo..hi.max(lo)]
    }

    pub fn contains(&self, slot: &Slot) -> bool {
        self.slots.binary_search(slot).is_ok()
    }

    /// Remove `slot` if it is on the list. Returns whether anything was removed;
    /// an absent slot is not an error.
    pub fn remove(&mut self, slot: &Slot) -> bool {
        match self.slots.binary_search(slot) {
            Ok(idx) => {
                self.slots.remove(idx);
                true
            }
            Err(_) => false,
        }
    }
}

impl<'a> IntoIterator for &'a FreeList {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// Generate the full candidate grid described by `spec`.
///
/// Slots are ascending and unique: each day contributes the points
/// `hours.start, hours.start + g, ...` that fall inside the window.
///
/// # Errors
/// Returns `SlotError::InvalidDateRange` if `end_date < start_date` and
/// `SlotError::InvalidWorkingHours` if the window is empty.
pub fn build_grid(spec: &GridSpec) -> Result<FreeList> {
    if spec.end_date < spec.start_date {
        return Err(SlotError::InvalidDateRange {
            start: spec.start_date.to_string(),
            end: spec.end_date.to_string(),
        });
    }
    spec.hours.validate()?;

    let offset = spec.anchor.fixed();
    let step = spec.granularity.duration();
    let mut slots = Vec::new();

    for date in spec.start_date.iter_days() {
        if date > spec.end_date {
            break;
        }

        let mut cursor = spec.hours.start;
        loop {
            if !spec.hours.contains(cursor) {
                break;
            }
            let local = date.and_time(cursor);
            let instant = local.and_local_timezone(offset).single().ok_or_else(|| {
                SlotError::InvalidDate(format!("{local} has no single instant at {}", spec.anchor))
            })?;
            slots.push(Slot::new(instant));

            let (next, wrapped) = cursor.overflowing_add_signed(step);
            // Stepping past midnight means the day is done.
            if wrapped != 0 || next <= cursor {
                break;
            }
            cursor = next;
        }
    }

    tracing::debug!(
        slots = slots.len(),
        granularity = %spec.granularity,
        anchor = %spec.anchor,
        "built candidate grid"
    );

    Ok(FreeList {
        slots,
        granularity: spec.granularity,
        anchor: spec.anchor,
    })
}
