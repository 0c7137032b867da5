// In crates/strategies/src/lib.rs

use core_types::{PriceSeries, SignalRow};

pub mod error;
pub mod events;
pub mod rolling;
pub mod sma_crossover;
pub mod types;

pub use error::{Error, Result};
pub use events::{crossover_events, CrossoverEvent, SignalSummary};
pub use sma_crossover::{compute_signals, SmaCrossover};

/// The universal interface for a signal strategy.
///
/// A strategy reads a price series and produces one `SignalRow` per price
/// point. Implementations are pure: the same series always yields the same rows.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn assess(&self, series: &PriceSeries) -> Vec<SignalRow>;
}
