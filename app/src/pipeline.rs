// In app/src/pipeline.rs

use anyhow::Result;
use api_client::{PriceRequest, PriceSeriesProvider};
use charting::ChartOptions;
use core_types::{DateRange, Market, SignalRow, Symbol};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use strategies::{crossover_events, CrossoverEvent, SignalSummary, SmaCrossover, Strategy};

use crate::output::{self, OutputFormat};

/// Everything produced by one analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub symbol: Symbol,
    pub market: Market,
    pub range: DateRange,
    pub short_window: usize,
    pub long_window: usize,
    pub summary: SignalSummary,
    pub crossovers: Vec<CrossoverEvent>,
    pub rows: Vec<SignalRow>,
}

/// What happened to the optional chart after the table was written.
#[derive(Debug)]
pub enum ChartOutcome {
    Skipped,
    Written(PathBuf),
    Failed(charting::Error),
}

/// Fetches the series from `provider` and computes the signal table.
///
/// Provider errors are returned unchanged; nothing is retried.
pub async fn run_analysis<P>(
    provider: &P,
    request: &PriceRequest,
    engine: &SmaCrossover,
) -> Result<AnalysisReport>
where
    P: PriceSeriesProvider + ?Sized,
{
    tracing::info!(
        provider = provider.name(),
        symbol = %request.symbol,
        market = %request.market,
        range = %request.range,
        "Fetching price series."
    );
    let series = provider.fetch(request).await?;

    let rows = engine.assess(&series);
    let summary = SignalSummary::from_rows(&rows);
    let crossovers = crossover_events(&rows);
    tracing::info!(
        strategy = engine.name(),
        short_window = engine.short_window(),
        long_window = engine.long_window(),
        rows = rows.len(),
        crossovers = crossovers.len(),
        "Signals computed."
    );

    Ok(AnalysisReport {
        symbol: request.symbol.clone(),
        market: request.market.clone(),
        range: request.range,
        short_window: engine.short_window(),
        long_window: engine.long_window(),
        summary,
        crossovers,
        rows,
    })
}

/// Writes the report to `out`, then renders the chart if one is requested.
///
/// The table is fully written before any rendering starts, and a failed chart
/// is reported in the outcome rather than as an error.
pub fn publish<W: Write>(
    report: &AnalysisReport,
    format: OutputFormat,
    chart: Option<(PathBuf, ChartOptions)>,
    out: &mut W,
) -> Result<ChartOutcome> {
    output::write_report(report, format, out)?;
    out.flush()?;

    let Some((path, options)) = chart else {
        return Ok(ChartOutcome::Skipped);
    };

    match charting::render(&report.rows, &path, &options) {
        Ok(()) => Ok(ChartOutcome::Written(path)),
        Err(e) => {
            tracing::warn!(
                kind = "RenderError",
                error = %e,
                "Chart rendering failed; the signal table is unaffected."
            );
            Ok(ChartOutcome::Failed(e))
        }
    }
}
