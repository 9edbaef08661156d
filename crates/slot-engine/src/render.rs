//! Human-readable rendering of the free list.
//!
//! One line per surviving slot:
//!
//! ```text
//! 2024-01-08   08:00 UTC+1   12:00 UTC+5 (Monday)
//!              08:30 UTC+1   12:30 UTC+5 (Monday)
//! ```
//!
//! Every column is the slot's instant seen at that column's offset. The date
//! column is printed only when it changes. Filters are applied here
//! and never touch the [`FreeList`] itself.

use chrono::{Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::grid::{FreeList, Slot};
use crate::offset::UtcOffset;
use crate::time;

const RULE_WIDTH: usize = 50;
const FOOTER: &str = "(https://everytimezone.com is a useful tool for timezone conversion)";

/// Display filters and extra columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub viewer: UtcOffset,
    #[serde(default)]
    pub extra: Vec<UtcOffset>,
    /// Hide slots whose hour is earlier than this.
    pub no_earlier: u32,
    /// Hide slots whose hour is this or later.
    pub no_later: u32,
    #[serde(default)]
    pub show_weekend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewer: UtcOffset::default(),
            extra: Vec::new(),
            no_earlier: 8,
            no_later: 17,
            show_weekend: false,
        }
    }
}

impl RenderOptions {
    /// # Errors
    /// Returns `SlotError::InvalidHourFilter` if either bound exceeds 24 or the
    /// bounds are reversed.
    pub fn validate(&self) -> Result<()> {
        if self.no_earlier > 24 || self.no_later > 24 {
            return Err(SlotError::InvalidHourFilter(format!(
                "hours must be within 0..=24 (got {}..{})",
                self.no_earlier, self.no_later
            )));
        }
        if self.no_earlier > self.no_later {
            return Err(SlotError::InvalidHourFilter(format!(
                "no-earlier {} is after no-later {}",
                self.no_earlier, self.no_later
            )));
        }
        Ok(())
    }

    /// Whether `slot` passes the hour and weekend filters.
    ///
    /// The hour and weekday are read off the slot as seen at the viewer's
    /// offset, which for a grid anchored there is its literal wall clock.
    pub fn keeps(&self, slot: &Slot) -> bool {
        let local = slot.in_offset(self.viewer);
        let hour = local.hour();
        if hour < self.no_earlier || hour >= self.no_later {
            return false;
        }
        self.show_weekend || !matches!(time::weekday_of(&local), Weekday::Sat | Weekday::Sun)
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Render one line per slot that passes the filters, in list order.
pub fn render_lines(free: &FreeList, options: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    let mut last_date: Option<String> = None;

    for slot in free.iter().filter(|s| options.keeps(s)) {
        let local = slot.in_offset(options.viewer);
        let label = time::format_instant(&local);
        let (date, clock) = label.split_once(' ').unwrap_or((label.as_str(), ""));

        let date_column = if last_date.as_deref() == Some(date) {
            ""
        } else {
            last_date = Some(date.to_string());
            date
        };

        let mut line = format!("{date_column:<10}   {clock} {}", options.viewer);
        for extra in &options.extra {
            let shifted = slot.in_offset(*extra);
            line.push_str(&format!("   {} {}", shifted.format("%H:%M"), extra));
        }
        line.push_str(&format!(" ({})", weekday_name(time::weekday_of(&local))));
        lines.push(line);
    }

    lines
}

pub fn header(free: &FreeList) -> Vec<String> {
    vec![
        format!(
            "Here are the free ({} min) slots working for me/us",
            free.granularity().minutes()
        ),
        "-".repeat(RULE_WIDTH),
    ]
}

pub fn footer() -> Vec<String> {
    vec![String::new(), FOOTER.to_string()]
}

/// The full report: header, slot lines, footer, newline-terminated.
pub fn render_report(free: &FreeList, options: &RenderOptions) -> String {
    let mut out = String::new();
    for line in header(free)
        .into_iter()
        .chain(render_lines(free, options))
        .chain(footer())
    {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
