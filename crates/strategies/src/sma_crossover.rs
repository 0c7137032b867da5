// In crates/strategies/src/sma_crossover.rs

use crate::error::{Error, Result};
use crate::rolling::RollingMean;
use crate::types::SmaCrossoverSettings;
use crate::Strategy;
use core_types::{PriceSeries, Signal, SignalRow};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// The simple-moving-average crossover signal engine.
///
/// For every price point it reports the short and long SMAs ending at that
/// point and a signal: `Buy` when the short average is above the long one,
/// `Sell` when it is below, `None` when they are equal or when either is still
/// warming up.
///
/// The engine does not require `short_window < long_window`. With the windows
/// reversed the "short" average is the slow one, so `Buy`/`Sell` flip meaning
/// accordingly; with equal windows every warmed-up row is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaCrossover {
    short_window: usize,
    long_window: usize,
}

impl SmaCrossover {
    /// Creates the engine, rejecting a zero-length window.
    pub fn new(short_window: usize, long_window: usize) -> Result<Self> {
        if short_window == 0 || long_window == 0 {
            return Err(Error::InvalidWindow { short_window, long_window });
        }
        Ok(Self { short_window, long_window })
    }

    pub fn from_settings(settings: &SmaCrossoverSettings) -> Result<Self> {
        Self::new(settings.short_window, settings.long_window)
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// Computes one row per price point in a single pass over the series.
    pub fn compute(&self, series: &PriceSeries) -> Vec<SignalRow> {
        let mut short = RollingMean::new(self.short_window);
        let mut long = RollingMean::new(self.long_window);

        series
            .iter()
            .map(|point| {
                let sma_short = short.next(point.closing_price);
                let sma_long = long.next(point.closing_price);
                SignalRow {
                    date: point.date,
                    closing_price: point.closing_price,
                    sma_short,
                    sma_long,
                    signal: classify(sma_short, sma_long),
                }
            })
            .collect()
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &'static str {
        "SmaCrossover"
    }

    fn assess(&self, series: &PriceSeries) -> Vec<SignalRow> {
        self.compute(series)
    }
}

/// Computes SMAs and crossover signals for `series`.
///
/// Fails only with `Error::InvalidWindow` when a window is zero. A window longer
/// than the series is not an error: that average simply never becomes defined.
pub fn compute_signals(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<Vec<SignalRow>> {
    Ok(SmaCrossover::new(short_window, long_window)?.compute(series))
}

/// The signal for a pair of averages.
pub fn classify(sma_short: Option<Decimal>, sma_long: Option<Decimal>) -> Signal {
    match (sma_short, sma_long) {
        (Some(short), Some(long)) => match short.cmp(&long) {
            Ordering::Greater => Signal::Buy,
            Ordering::Less => Signal::Sell,
            Ordering::Equal => Signal::None,
        },
        _ => Signal::None,
    }
}
