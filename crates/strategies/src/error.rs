// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid window sizes: short={short_window}, long={long_window} (both must be at least 1)")]
    InvalidWindow { short_window: usize, long_window: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
