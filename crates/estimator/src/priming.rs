//! Priming heuristics.
//!
//! The first probe always runs at the ceiling. When it succeeds, the reported
//! consumption is usually far below the ceiling, so instead of halving from the
//! top the search jumps close to the consumed amount.

use crate::Gas;
use serde::{Deserialize, Serialize};

/// Midpoint of `[low, high]`, rounded down.
pub fn midpoint(low: Gas, high: Gas) -> Gas {
    low + (high - low) / 2
}

/// Chooses the probe that follows the first successful one.
pub trait PrimingStrategy {
    /// Next limit to probe, given the consumption of the first success and the
    /// bracket as it stood before that probe.
    ///
    /// The caller clamps the returned value into the bracket.
    fn next_limit(&self, consumed: Gas, low: Gas, high: Gas) -> Gas;
}

/// Built-in priming strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Priming {
    /// A multiple of the consumed gas, capped at the bracket midpoint.
    Multiple { factor: u64 },
    /// No heuristic: plain bisection.
    Bisect,
}

impl Default for Priming {
    fn default() -> Self {
        Priming::Multiple { factor: 3 }
    }
}

impl PrimingStrategy for Priming {
    fn next_limit(&self, consumed: Gas, low: Gas, high: Gas) -> Gas {
        let mid = midpoint(low, high);
        match *self {
            Priming::Multiple { factor } => consumed.saturating_mul(factor).min(mid),
            Priming::Bisect => mid,
        }
    }
}
