// In crates/app-config/src/types.rs

use chrono::NaiveDate;
use serde::Deserialize;

use core_types::{DateRange, Market, Symbol};
use strategies::types::SmaCrossoverSettings;

use crate::error::Result;

/// The calendar year analysed when no explicit range is configured.
pub const DEFAULT_YEAR: i32 = 2020;

/// The environment variable the quote provider's API key is read from by default.
pub const DEFAULT_API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Settings for the remote quote provider.
    #[serde(default)]
    pub provider: ProviderSettings,
    /// What to analyse and over which dates.
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub strategies: StrategySettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// The REST base URL of the quote provider.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// The time series function to query.
    #[serde(default = "default_function")]
    pub function: String,
    /// An API key set directly in configuration (e.g., `APP__PROVIDER__API_KEY`).
    #[serde(default)]
    pub api_key: Option<String>,
    /// The environment variable consulted when `api_key` is not set.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Timeout for the whole HTTP request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            function: default_function(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    /// Resolves the API key from configuration, then from the process environment.
    ///
    /// Returns `None` when neither holds a non-blank value. There is no built-in
    /// fallback key.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Like `resolve_api_key`, with the environment lookup supplied by the caller.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let configured = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned);

        configured.or_else(|| {
            lookup(&self.api_key_env)
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty())
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AnalysisSettings {
    /// The digital currency to analyse (e.g., "BTC").
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// The market the prices are quoted in (e.g., "GBP").
    #[serde(default = "default_market")]
    pub market: String,
    /// Calendar year used when `start_date`/`end_date` are not both set.
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            market: default_market(),
            year: default_year(),
            start_date: None,
            end_date: None,
        }
    }
}

impl AnalysisSettings {
    pub fn symbol(&self) -> Symbol {
        Symbol(self.symbol.trim().to_uppercase())
    }

    pub fn market(&self) -> Market {
        Market(self.market.trim().to_uppercase())
    }

    /// The configured date range.
    ///
    /// A missing start defaults to January 1st of `year` and a missing end to
    /// December 31st of the start's year.
    pub fn date_range(&self) -> Result<DateRange> {
        let year = DateRange::calendar_year(self.year)?;
        let range = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DateRange::new(start, end)?,
            (Some(start), None) => {
                let end = DateRange::calendar_year(chrono::Datelike::year(&start))?.end();
                DateRange::new(start, end)?
            }
            (None, Some(end)) => DateRange::new(year.start(), end)?,
            (None, None) => year,
        };
        Ok(range)
    }
}

// Define the container for all strategy settings
#[derive(Deserialize, Debug, Default, Clone)]
pub struct StrategySettings {
    #[serde(default)]
    pub sma_crossover: SmaCrossoverSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChartSettings {
    /// Whether a chart is rendered after the table is printed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Where the SVG chart is written.
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            output_path: default_output_path(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Helper functions for serde defaults
fn default_environment() -> String {
    "development".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_base_url() -> String {
    "https://www.alphavantage.co".into()
}

fn default_function() -> String {
    "DIGITAL_CURRENCY_DAILY".into()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_symbol() -> String {
    "BTC".into()
}

fn default_market() -> String {
    "GBP".into()
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

fn default_enabled() -> bool {
    true
}

fn default_output_path() -> String {
    "sma_chart.svg".into()
}

fn default_width() -> u32 {
    1500
}

fn default_height() -> u32 {
    1000
}
