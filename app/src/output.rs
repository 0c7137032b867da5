// In app/src/output.rs

use anyhow::Result;
use clap::ValueEnum;
use core_types::SignalRow;
use rust_decimal::Decimal;
use std::io::Write;

use crate::pipeline::AnalysisReport;

/// Decimal places shown for the averages in the table.
const SMA_DISPLAY_DP: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A fixed-width table followed by a summary.
    Table,
    /// The full report as pretty-printed JSON.
    Json,
}

pub fn write_report<W: Write>(report: &AnalysisReport, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn fmt_sma(value: Option<Decimal>) -> String {
    value
        .map(|v| v.round_dp(SMA_DISPLAY_DP).normalize().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn write_row<W: Write>(out: &mut W, index: usize, row: &SignalRow) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>5}  {:<10}  {:>18}  {:>18}  {:>18}  {}",
        index,
        row.date,
        row.closing_price.normalize().to_string(),
        fmt_sma(row.sma_short),
        fmt_sma(row.sma_long),
        row.signal,
    )
}

fn write_table<W: Write>(report: &AnalysisReport, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "\n--- {}/{} SMA crossover ({} to {}) ---",
        report.symbol,
        report.market,
        report.range.start(),
        report.range.end()
    )?;
    writeln!(
        out,
        "{:>5}  {:<10}  {:>18}  {:>18}  {:>18}  {}",
        "",
        "date",
        "closing_price",
        format!("SMA_{}", report.short_window),
        format!("SMA_{}", report.long_window),
        "signal"
    )?;
    for (i, row) in report.rows.iter().enumerate() {
        write_row(out, i, row)?;
    }

    let summary = &report.summary;
    writeln!(out, "---------------------------------")?;
    writeln!(
        out,
        "Rows: {} | Warm-up: {} | BUY: {} | SELL: {} | Equal averages: {}",
        summary.total_rows, summary.warm_up_rows, summary.buy_rows, summary.sell_rows, summary.neutral_rows
    )?;

    if report.crossovers.is_empty() {
        writeln!(out, "Crossovers: none")?;
    } else {
        writeln!(out, "Crossovers:")?;
        for event in &report.crossovers {
            writeln!(
                out,
                "  {}  {:<4}  close {}  SMA_{} {}  SMA_{} {}",
                event.date,
                event.signal,
                event.closing_price.normalize(),
                report.short_window,
                fmt_sma(Some(event.sma_short)),
                report.long_window,
                fmt_sma(Some(event.sma_long)),
            )?;
        }
    }

    match summary.latest_signal {
        Some((date, signal)) => writeln!(out, "Latest signal: {signal} on {date}")?,
        None => writeln!(out, "Latest signal: none")?,
    }
    Ok(())
}
