//! # slot-engine
//!
//! Find meeting slots that are free for everyone in a group.
//!
//! A run lays a fixed-width slot grid over the working hours of each day in a
//! date range, subtracts every participant's busy intervals (as reported by a
//! calendar free/busy query) and renders what survives, optionally with extra
//! columns for other UTC offsets.
//!
//! ## Modules
//!
//! - [`grid`] — Slot grid generation and the [`FreeList`] it produces
//! - [`subtract`] — Busy-interval subtraction, start-anchored rounding
//! - [`render`] — Hour/weekend filters and multi-offset text output
//! - [`freebusy`] — Free/busy request and response types, [`FreeBusySource`]
//! - [`search`] — The end-to-end pipeline and its [`SearchConfig`]
//! - [`granularity`] — Validated slot width
//! - [`offset`] — Whole-hour UTC offsets
//! - [`time`] — Instant parsing/formatting helpers
//! - [`error`] — Error types

pub mod error;
pub mod freebusy;
pub mod granularity;
pub mod grid;
pub mod offset;
pub mod render;
pub mod search;
pub mod subtract;
pub mod time;

pub use error::{Result, SlotError};
pub use freebusy::{parse_response, BusyInterval, BusyMap, FreeBusyQuery, FreeBusySource, PersonBusy, RecordedResponse};
pub use granularity::Granularity;
pub use grid::{build_grid, FreeList, GridSpec, Slot, WorkingHours};
pub use offset::UtcOffset;
pub use render::{render_lines, render_report, RenderOptions};
pub use search::{find_free_slots, run, SearchConfig};
pub use subtract::subtract_busy;
