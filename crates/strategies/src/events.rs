// In crates/strategies/src/events.rs

use chrono::NaiveDate;
use core_types::{Signal, SignalRow};
use rust_decimal::Decimal;
use serde::Serialize;

/// A day on which the short average crossed the long one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrossoverEvent {
    pub date: NaiveDate,
    /// `Buy` for a bullish cross, `Sell` for a bearish one.
    pub signal: Signal,
    pub closing_price: Decimal,
    pub sma_short: Decimal,
    pub sma_long: Decimal,
}

/// Extracts the rows where the decided signal changes direction.
///
/// The first `Buy` or `Sell` after warm-up counts as a crossover. Rows where
/// the averages are equal do not reset the direction, so `Buy, None, Buy`
/// yields a single event while `Buy, None, Sell` yields two.
pub fn crossover_events(rows: &[SignalRow]) -> Vec<CrossoverEvent> {
    let mut last_decided: Option<Signal> = None;
    let mut events = Vec::new();

    for row in rows {
        if !row.signal.is_decided() {
            continue;
        }
        if last_decided != Some(row.signal) {
            if let (Some(sma_short), Some(sma_long)) = (row.sma_short, row.sma_long) {
                events.push(CrossoverEvent {
                    date: row.date,
                    signal: row.signal,
                    closing_price: row.closing_price,
                    sma_short,
                    sma_long,
                });
            }
            last_decided = Some(row.signal);
        }
    }

    events
}

/// Aggregate counts over a computed signal table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalSummary {
    pub total_rows: usize,
    pub warm_up_rows: usize,
    pub buy_rows: usize,
    pub sell_rows: usize,
    /// Rows past warm-up where the two averages were equal.
    pub neutral_rows: usize,
    pub crossovers: usize,
    /// The most recent row carrying a `Buy` or `Sell`.
    pub latest_signal: Option<(NaiveDate, Signal)>,
}

impl SignalSummary {
    pub fn from_rows(rows: &[SignalRow]) -> Self {
        let mut summary = Self {
            total_rows: rows.len(),
            crossovers: crossover_events(rows).len(),
            ..Self::default()
        };

        for row in rows {
            match row.signal {
                Signal::Buy => summary.buy_rows += 1,
                Signal::Sell => summary.sell_rows += 1,
                Signal::None if row.is_warming_up() => summary.warm_up_rows += 1,
                Signal::None => summary.neutral_rows += 1,
            }
        }

        summary.latest_signal = rows
            .iter()
            .rev()
            .find(|row| row.signal.is_decided())
            .map(|row| (row.date, row.signal));

        summary
    }
}
