// In crates/charting/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Nothing to plot: the signal table is empty")]
    EmptySeries,

    #[error("Failed to render chart: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
