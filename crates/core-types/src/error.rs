// In crates/core-types/src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Price series is not strictly increasing by date: {next} follows {previous}")]
    UnorderedSeries { previous: NaiveDate, next: NaiveDate },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Year {0} is outside the supported calendar")]
    InvalidYear(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
