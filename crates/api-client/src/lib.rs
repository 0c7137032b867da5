// In crates/api-client/src/lib.rs

use app_config::ProviderSettings;
use async_trait::async_trait;
use core_types::{Market, PriceSeries, Symbol};
use std::time::Duration;

pub mod error;
pub mod parse;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// The source of daily closing prices consumed by the signal pipeline.
///
/// Implementations either return a series with exactly one close per day of
/// the requested range or fail; they never fill gaps or retry on their own.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// The name of the provider, for logging.
    fn name(&self) -> &'static str;

    /// Fetches the closing prices for `request`.
    ///
    /// # Errors
    ///
    /// * `Error::DataUnavailable` (and the request/deserialization variants)
    ///   when the remote call does not succeed.
    /// * `Error::IncompleteSeries` when a day of the range has no price.
    async fn fetch(&self, request: &PriceRequest) -> Result<PriceSeries>;
}

impl AlphaVantageClient {
    /// Constructs a new client from `ProviderSettings`.
    ///
    /// Fails with `Error::MissingCredential` when no API key can be resolved.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key().ok_or_else(|| Error::MissingCredential {
            env_var: settings.api_key_env.clone(),
        })?;
        Self::with_api_key(settings, api_key)
    }

    /// Constructs a new client with an explicitly supplied API key.
    pub fn with_api_key(settings: &ProviderSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingCredential {
                env_var: settings.api_key_env.clone(),
            });
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(AlphaVantageClient {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            function: settings.function.clone(),
            api_key,
        })
    }

    /// Fetches the full daily history for a symbol/market pair.
    ///
    /// This corresponds to the `GET /query?function=DIGITAL_CURRENCY_DAILY` endpoint.
    pub async fn get_daily_series(&self, symbol: &Symbol, market: &Market) -> Result<RawDailyResponse> {
        let url = format!("{}/query", self.base_url);

        tracing::info!(
            symbol = %symbol,
            market = %market,
            function = %self.function,
            "Requesting daily prices from the quote provider."
        );

        // The key travels in the query string, so URLs are stripped from request errors.
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("function", self.function.as_str()),
                ("symbol", symbol.0.as_str()),
                ("market", market.0.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::RequestFailed(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::DataUnavailable(format!("provider answered with HTTP {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::RequestFailed(e.without_url()))?;
        let raw: RawDailyResponse = serde_json::from_str(&text).map_err(Error::DeserializationFailed)?;

        parse::check_api_error(&raw)?;

        Ok(raw)
    }
}

#[async_trait]
impl PriceSeriesProvider for AlphaVantageClient {
    fn name(&self) -> &'static str {
        "AlphaVantage"
    }

    async fn fetch(&self, request: &PriceRequest) -> Result<PriceSeries> {
        let raw = self.get_daily_series(&request.symbol, &request.market).await?;
        let closes = parse::parse_daily_closes(&raw, &request.market, &request.range)?;
        tracing::debug!(available_days = closes.len(), "Parsed daily closes.");

        let series = parse::assemble_series(&closes, &request.range)?;
        tracing::info!(
            points = series.len(),
            range = %request.range,
            "Price series assembled."
        );

        Ok(series)
    }
}
