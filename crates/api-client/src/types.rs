// In crates/api-client/src/types.rs

use core_types::{DateRange, Market, Symbol};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The key of the daily series object in a `DIGITAL_CURRENCY_DAILY` response.
pub const DAILY_SERIES_KEY: &str = "Time Series (Digital Currency Daily)";

/// What to fetch: one digital currency, quoted in one market, over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub symbol: Symbol,
    pub market: Market,
    pub range: DateRange,
}

/// The client for the Alpha Vantage digital currency API.
#[derive(Clone)]
pub struct AlphaVantageClient {
    /// The persistent HTTP client.
    pub(crate) http_client: Client,
    /// The REST base URL, without the `/query` path.
    pub(crate) base_url: String,
    /// The time series function, normally `DIGITAL_CURRENCY_DAILY`.
    pub(crate) function: String,
    pub(crate) api_key: String,
}

impl fmt::Debug for AlphaVantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageClient")
            .field("base_url", &self.base_url)
            .field("function", &self.function)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Temporary struct to deserialize the daily response body.
///
/// A successful response carries the series object; a throttled or rejected
/// request carries one of the message fields instead, still with HTTP 200.
#[derive(Debug, Deserialize, Default)]
pub struct RawDailyResponse {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
    /// Date ("YYYY-MM-DD") → field name (e.g., "4a. close (GBP)") → decimal string.
    #[serde(rename = "Time Series (Digital Currency Daily)")]
    pub time_series: Option<BTreeMap<String, HashMap<String, String>>>,
}
