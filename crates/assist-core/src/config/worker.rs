//! Periodic sweep configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the scheduled-notification sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the sweep is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between sweep ticks.
    ///
    /// Values of 60 or above are rounded down to whole minutes by the cron
    /// schedule; sub-minute values run on a seconds schedule.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    60
}
