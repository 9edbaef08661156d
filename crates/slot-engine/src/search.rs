//! The build → subtract → render pipeline.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::freebusy::{FreeBusyQuery, FreeBusySource};
use crate::granularity::Granularity;
use crate::grid::{self, FreeList, GridSpec, WorkingHours};
use crate::offset::UtcOffset;
use crate::render::{self, RenderOptions};
use crate::subtract;

/// Everything one run needs, as supplied by the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub working_hours: WorkingHours,
    #[serde(rename = "granularity_hours")]
    pub granularity: Granularity,
    #[serde(rename = "viewer_utc_offset")]
    pub viewer: UtcOffset,
    #[serde(rename = "extra_utc_offsets")]
    pub extra: Vec<UtcOffset>,
    #[serde(rename = "no_earlier_hour")]
    pub no_earlier: u32,
    #[serde(rename = "no_later_hour")]
    pub no_later: u32,
    pub show_weekend: bool,
    pub people: Vec<String>,
    /// Appended to person identifiers that lack one.
    pub domain: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let today = Local::now().date_naive();
        let display = RenderOptions::default();
        Self {
            start_date: today,
            end_date: today,
            working_hours: WorkingHours::default(),
            granularity: Granularity::default(),
            viewer: UtcOffset::default(),
            extra: Vec::new(),
            no_earlier: display.no_earlier,
            no_later: display.no_later,
            show_weekend: display.show_weekend,
            people: Vec::new(),
            domain: None,
        }
    }
}

impl SearchConfig {
    /// Check everything that can be checked before talking to the provider.
    ///
    /// # Errors
    /// Returns the first configuration problem found.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(crate::SlotError::InvalidDateRange {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }
        self.working_hours.validate()?;
        self.render_options().validate()
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            start_date: self.start_date,
            end_date: self.end_date,
            hours: self.working_hours,
            granularity: self.granularity,
            anchor: self.viewer,
        }
    }

    pub fn query(&self) -> FreeBusyQuery {
        FreeBusyQuery::new(
            self.start_date,
            self.end_date,
            self.working_hours.start,
            self.working_hours.end,
            self.viewer,
            &self.people,
            self.domain.as_deref(),
        )
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            viewer: self.viewer,
            extra: self.extra.clone(),
            no_earlier: self.no_earlier,
            no_later: self.no_later,
            show_weekend: self.show_weekend,
        }
    }
}

/// Validate, query `source`, build the grid and subtract everyone's busy time.
///
/// # Errors
/// Configuration errors are returned before `source` is consulted; a failing
/// source aborts the run with no partial result.
pub fn find_free_slots(config: &SearchConfig, source: &dyn FreeBusySource) -> Result<FreeList> {
    config.validate()?;

    let query = config.query();
    let busy = source.query(&query)?;

    let mut free = grid::build_grid(&config.grid_spec())?;
    let candidates = free.len();
    let removed = subtract::subtract_busy(&mut free, &busy);

    tracing::info!(
        people = busy.len(),
        candidates,
        removed,
        free = free.len(),
        "computed shared free slots"
    );
    Ok(free)
}

/// Run the whole pipeline and return the printable report.
///
/// # Errors
/// See [`find_free_slots`].
pub fn run(config: &SearchConfig, source: &dyn FreeBusySource) -> Result<String> {
    let free = find_free_slots(config, source)?;
    Ok(render::render_report(&free, &config.render_options()))
}
