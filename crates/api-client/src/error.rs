// In crates/api-client/src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No API key for the quote provider: set `{env_var}` or `provider.api_key`")]
    MissingCredential { env_var: String },
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Price data unavailable: {0}")]
    DataUnavailable(String),
    #[error("Price data unavailable: request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Price data unavailable: deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error(
        "Incomplete price series: {} requested date(s) have no close price (first missing: {})",
        .missing.len(),
        .missing.first().map(ToString::to_string).unwrap_or_default()
    )]
    IncompleteSeries { missing: Vec<NaiveDate> },
    #[error("Price data unavailable: {0}")]
    InvalidSeries(#[from] core_types::Error),
}

impl Error {
    /// The failure category reported to users.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingCredential { .. } => "MissingCredential",
            Error::IncompleteSeries { .. } => "IncompleteSeries",
            Error::ClientBuildError(_) => "ClientBuild",
            Error::DataUnavailable(_)
            | Error::RequestFailed(_)
            | Error::DeserializationFailed(_)
            | Error::InvalidSeries(_) => "DataUnavailable",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
