// In crates/strategies/src/rolling.rs

use rust_decimal::Decimal;
use std::collections::VecDeque;

/// An incremental simple moving average over the last `window` values.
///
/// Keeps a running sum: each new value is added and the value leaving the
/// window is subtracted, so every step costs O(1). `Decimal` addition is exact
/// at price scales, so the running sum never drifts from the true window sum.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<Decimal>,
    sum: Decimal,
}

impl RollingMean {
    /// `window` must be at least 1; callers validate it beforehand.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window + 1),
            sum: Decimal::ZERO,
        }
    }

    /// Pushes `value` and returns the mean once the window is full.
    pub fn next(&mut self, value: Decimal) -> Option<Decimal> {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.window {
            if let Some(leaving) = self.values.pop_front() {
                self.sum -= leaving;
            }
        }

        self.value()
    }

    /// The current mean, or `None` during warm-up.
    pub fn value(&self) -> Option<Decimal> {
        if self.values.len() == self.window {
            Some(self.sum / Decimal::from(self.window))
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.values.len() == self.window
    }
}
