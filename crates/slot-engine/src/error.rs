//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// The slot width does not divide an hour into whole-minute slots.
    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("Invalid hour filter: {0}")]
    InvalidHourFilter(String),

    /// The free/busy collaborator failed or returned data we cannot use.
    #[error("Free/busy query failed: {0}")]
    QueryFailure(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
