//! Remove busy time from a [`FreeList`].
//!
//! Coverage is anchored at each busy interval's start: an interval covers
//! `[start, start + n * granularity)` where `n = ceil(duration / granularity)`
//! and `start` is truncated to the minute. The exact end instant is not
//! consulted, so coverage can overshoot or fall short of it by up to one slot.
//! Existing reports depend on this rounding; keep it.

use chrono::{DateTime, FixedOffset};

use crate::freebusy::{BusyInterval, PersonBusy};
use crate::grid::{FreeList, Slot};
use crate::time;

/// The half-open instant range `busy` covers on a grid of `free`'s width.
pub fn coverage(busy: &BusyInterval, free: &FreeList) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let granularity = free.granularity();
    let count = granularity.slots_covering(busy.duration());
    let from = Slot::new(busy.start()).start();
    let minutes = i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::from(granularity.minutes()));
    (from, time::add_minutes(from, minutes))
}

/// Remove every slot covered by `busy`. Returns how many slots were removed.
pub fn subtract_interval(free: &mut FreeList, busy: &BusyInterval) -> usize {
    let (from, to) = coverage(busy, free);
    let covered: Vec<Slot> = free.range(from, to).to_vec();

    let mut removed = 0;
    for slot in &covered {
        if free.remove(slot) {
            tracing::debug!(slot = %slot, "removing busy slot");
            removed += 1;
        }
    }
    removed
}

/// Subtract every person's busy intervals, in the order given.
///
/// Removal is idempotent and commutative, so overlapping intervals across
/// people and the order of `busy` do not change the result.
pub fn subtract_busy(free: &mut FreeList, busy: &[PersonBusy]) -> usize {
    let before = free.len();
    for person in busy {
        let removed: usize = person
            .busy
            .iter()
            .map(|interval| subtract_interval(free, interval))
            .sum();
        tracing::debug!(
            person = %person.person,
            intervals = person.busy.len(),
            removed,
            "subtracted busy time"
        );
    }
    before - free.len()
}
