// In app/src/main.rs

use anyhow::Result;
use api_client::{AlphaVantageClient, PriceRequest};
use app_config::Settings;
use chrono::NaiveDate;
use charting::ChartOptions;
use clap::Parser;
use std::path::PathBuf;
use strategies::SmaCrossover;
use tracing_subscriber::prelude::*;

mod output;
mod pipeline;

use crate::output::OutputFormat;
use crate::pipeline::{AnalysisReport, ChartOutcome};

// --- Command-Line Interface Definition ---

/// Flags left unset fall back to `config/*.toml` and `APP__*` environment variables.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Fetches daily digital currency prices, computes short/long simple moving \
                  averages and prints the BUY/SELL crossover signal for every day."
)]
struct Cli {
    /// The digital currency to analyse (e.g., "BTC").
    #[arg(short, long)]
    symbol: Option<String>,

    /// The market the prices are quoted in (e.g., "GBP").
    #[arg(short, long)]
    market: Option<String>,

    /// Analyse a whole calendar year.
    #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
    year: Option<i32>,

    /// First day of the range, in YYYY-MM-DD format.
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day of the range (inclusive), in YYYY-MM-DD format.
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Number of days in the fast-reacting average.
    #[arg(long)]
    short_window: Option<usize>,

    /// Number of days in the slow-reacting average.
    #[arg(long)]
    long_window: Option<usize>,

    /// How the signal table is printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the chart to this path instead of the configured one.
    #[arg(long, conflicts_with = "no_chart")]
    chart: Option<PathBuf>,

    /// Do not render a chart.
    #[arg(long)]
    no_chart: bool,
}

impl Cli {
    /// Overlays the command-line flags on the loaded settings.
    fn apply_to(&self, settings: &mut Settings) {
        let analysis = &mut settings.analysis;
        if let Some(symbol) = &self.symbol {
            analysis.symbol = symbol.clone();
        }
        if let Some(market) = &self.market {
            analysis.market = market.clone();
        }
        if let Some(year) = self.year {
            analysis.year = year;
            analysis.start_date = None;
            analysis.end_date = None;
        }
        if self.start_date.is_some() {
            analysis.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            analysis.end_date = self.end_date;
        }

        let sma = &mut settings.strategies.sma_crossover;
        if let Some(short_window) = self.short_window {
            sma.short_window = short_window;
        }
        if let Some(long_window) = self.long_window {
            sma.long_window = long_window;
        }

        if let Some(path) = &self.chart {
            settings.chart.output_path = path.to_string_lossy().into_owned();
            settings.chart.enabled = true;
        }
        if self.no_chart {
            settings.chart.enabled = false;
        }
    }
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let mut settings = app_config::load_settings()?;
    cli.apply_to(&mut settings);

    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Starting sma-crossover");

    if let Err(err) = run(&cli, &settings).await {
        tracing::error!(kind = error_kind(&err), error = %err, "Analysis failed.");
        return Err(err);
    }

    tracing::info!("sma-crossover has finished successfully.");
    Ok(())
}

/// Logs go to stderr so that stdout carries only the report.
fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Fetches, computes, prints and charts one analysis.
async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    // Window sizes are checked before any network traffic.
    let engine = SmaCrossover::from_settings(&settings.strategies.sma_crossover)?;
    let request = PriceRequest {
        symbol: settings.analysis.symbol(),
        market: settings.analysis.market(),
        range: settings.analysis.date_range()?,
    };
    let provider = AlphaVantageClient::new(&settings.provider)?;

    let report = pipeline::run_analysis(&provider, &request, &engine).await?;

    let chart = chart_target(settings, &report);
    let mut stdout = std::io::stdout().lock();
    match pipeline::publish(&report, cli.format, chart, &mut stdout)? {
        ChartOutcome::Written(path) => tracing::debug!(path = %path.display(), "Chart step complete."),
        ChartOutcome::Failed(_) => {}
        ChartOutcome::Skipped => tracing::debug!("Chart rendering disabled."),
    }

    Ok(())
}

fn chart_target(settings: &Settings, report: &AnalysisReport) -> Option<(PathBuf, ChartOptions)> {
    if !settings.chart.enabled {
        return None;
    }
    let options = ChartOptions {
        width: settings.chart.width,
        height: settings.chart.height,
        title: format!(
            "{}/{} closing price, SMA {} vs SMA {} ({} to {})",
            report.symbol,
            report.market,
            report.short_window,
            report.long_window,
            report.range.start(),
            report.range.end()
        ),
        short_label: format!("SMA {} days", report.short_window),
        long_label: format!("SMA {} days", report.long_window),
    };
    Some((PathBuf::from(&settings.chart.output_path), options))
}

/// The error category shown to the user.
fn error_kind(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<api_client::Error>() {
        e.kind()
    } else if err.downcast_ref::<strategies::Error>().is_some() {
        "InvalidWindow"
    } else if err.downcast_ref::<charting::Error>().is_some() {
        "RenderError"
    } else if err.downcast_ref::<app_config::Error>().is_some() {
        "Configuration"
    } else {
        "Unexpected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{DateRange, Market, Symbol};
    use strategies::SignalSummary;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sma-crossover").chain(args.iter().copied())).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_leave_settings_untouched() {
        let cli = parse(&[]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(settings.analysis.symbol, "BTC");
        let range = settings.analysis.date_range().unwrap();
        assert_eq!(range, DateRange::calendar_year(2020).unwrap());
        assert!(settings.chart.enabled);
    }

    #[test]
    fn flags_override_settings() {
        let cli = parse(&[
            "--symbol", "eth", "-m", "usd",
            "--start-date", "2021-01-01", "--end-date", "2021-03-31",
            "--short-window", "10", "--long-window", "30",
            "--format", "json", "--chart", "out/eth.svg",
        ]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);

        assert_eq!(settings.analysis.symbol().0, "ETH");
        assert_eq!(settings.analysis.market().0, "USD");
        let range = settings.analysis.date_range().unwrap();
        assert_eq!((range.start(), range.end()), (day(2021, 1, 1), day(2021, 3, 31)));
        assert_eq!(settings.strategies.sma_crossover.short_window, 10);
        assert_eq!(settings.strategies.sma_crossover.long_window, 30);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(settings.chart.output_path, "out/eth.svg");
    }

    #[test]
    fn year_replaces_configured_dates() {
        let mut settings = Settings::default();
        settings.analysis.start_date = Some(day(2019, 5, 1));
        settings.analysis.end_date = Some(day(2019, 6, 1));

        parse(&["--year", "2022"]).apply_to(&mut settings);
        let range = settings.analysis.date_range().unwrap();
        assert_eq!(range, DateRange::calendar_year(2022).unwrap());
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let args = ["sma-crossover", "--year", "2021", "--start-date", "2021-02-01"];
        assert!(Cli::try_parse_from(args).is_err());
        assert!(Cli::try_parse_from(["sma-crossover", "--chart", "a.svg", "--no-chart"]).is_err());
        assert!(Cli::try_parse_from(["sma-crossover", "--start-date", "01/02/2021"]).is_err());
    }

    #[test]
    fn no_chart_disables_rendering() {
        let mut settings = Settings::default();
        parse(&["--no-chart"]).apply_to(&mut settings);

        let report = AnalysisReport {
            symbol: Symbol("BTC".into()),
            market: Market("GBP".into()),
            range: DateRange::calendar_year(2020).unwrap(),
            short_window: 3,
            long_window: 7,
            summary: SignalSummary::default(),
            crossovers: Vec::new(),
            rows: Vec::new(),
        };
        assert!(chart_target(&settings, &report).is_none());

        settings.chart.enabled = true;
        let (path, options) = chart_target(&settings, &report).unwrap();
        assert_eq!(path, PathBuf::from("sma_chart.svg"));
        assert_eq!(options.short_label, "SMA 3 days");
        assert_eq!(options.long_label, "SMA 7 days");
    }

    #[test]
    fn errors_are_reported_by_kind() {
        let missing = anyhow::Error::from(api_client::Error::MissingCredential {
            env_var: "ALPHAVANTAGE_API_KEY".into(),
        });
        assert_eq!(error_kind(&missing), "MissingCredential");

        let window = anyhow::Error::from(strategies::Error::InvalidWindow {
            short_window: 0,
            long_window: 7,
        });
        assert_eq!(error_kind(&window), "InvalidWindow");

        let render = anyhow::Error::from(charting::Error::Render("disk full".into()));
        assert_eq!(error_kind(&render), "RenderError");

        assert_eq!(error_kind(&anyhow::anyhow!("boom")), "Unexpected");
    }
}
