//! Estimator configuration.

use crate::Gas;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in an estimator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("floor must be below ceiling (min {min}, max {max})")]
    InvalidBounds { min: Gas, max: Gas },

    #[error("tolerance must be at most 100 percent, got {0}")]
    InvalidTolerance(u64),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Floor: no call can cost less than this.
    pub min_limit: Gas,
    /// Ceiling: the largest limit the caller is willing to try.
    pub max_limit: Gas,
    /// Stop once the bracket is at most this percentage of the upper bound.
    pub tolerance_percent: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_limit: 21_000,
            max_limit: 15_000_000,
            tolerance_percent: 10,
        }
    }
}

impl EstimatorConfig {
    /// Create a configuration with the default tolerance.
    pub fn new(min_limit: Gas, max_limit: Gas) -> Self {
        Self {
            min_limit,
            max_limit,
            ..Self::default()
        }
    }

    /// Set the relative tolerance.
    pub fn with_tolerance(mut self, tolerance_percent: u64) -> Self {
        self.tolerance_percent = tolerance_percent;
        self
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.min_limit >= self.max_limit {
            return Err(ConfigError::InvalidBounds {
                min: self.min_limit,
                max: self.max_limit,
            });
        }
        if self.tolerance_percent > 100 {
            return Err(ConfigError::InvalidTolerance(self.tolerance_percent));
        }
        Ok(())
    }

    /// Whether the bracket `[low, high]` is narrow enough to stop.
    ///
    /// A bracket of width one cannot be split further, so it always counts as
    /// converged.
    pub fn is_converged(&self, low: Gas, high: Gas) -> bool {
        let width = high.saturating_sub(low);
        if width <= 1 {
            return true;
        }
        u128::from(width) * 100 <= u128::from(high) * u128::from(self.tolerance_percent)
    }
}
