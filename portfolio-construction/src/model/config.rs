use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AllocatorError, Result};

pub const DEFAULT_PERCENT: f64 = 0.03;

fn default_percent() -> f64 {
    DEFAULT_PERCENT
}

fn default_rebalance_period_secs() -> i64 {
    24 * 60 * 60
}

/// Configuration for the accumulative construction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulativeConfig {
    /// Fraction of portfolio value moved per insight (0.03 = 3%).
    /// Stored as given; read back through `percent()` which is always
    /// non-negative.
    #[serde(default = "default_percent")]
    percent: f64,
}

impl Default for AccumulativeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PERCENT)
    }
}

impl AccumulativeConfig {
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    /// Step size, normalised to its absolute value.
    pub fn percent(&self) -> f64 {
        self.percent.abs()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AllocatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// Configuration for the equal-weighting construction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualWeightingConfig {
    /// Seconds between scheduled rebalances when no new insight arrives.
    #[serde(default = "default_rebalance_period_secs")]
    rebalance_period_secs: i64,
}

impl Default for EqualWeightingConfig {
    fn default() -> Self {
        Self {
            rebalance_period_secs: default_rebalance_period_secs(),
        }
    }
}

impl EqualWeightingConfig {
    pub fn new(rebalance_period: Duration) -> Self {
        Self {
            rebalance_period_secs: rebalance_period.num_seconds(),
        }
    }

    /// Rebalance period, saturating at the largest representable duration.
    pub fn rebalance_period(&self) -> Duration {
        Duration::try_seconds(self.rebalance_period_secs.max(0)).unwrap_or(Duration::MAX)
    }
}
