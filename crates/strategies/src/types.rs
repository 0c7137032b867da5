// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SmaCrossoverSettings {
    /// Number of daily closes in the fast-reacting average.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Number of daily closes in the slow-reacting average.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for SmaCrossoverSettings {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

fn default_short_window() -> usize {
    3
}

fn default_long_window() -> usize {
    7
}
