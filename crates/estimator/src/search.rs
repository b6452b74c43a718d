//! Bracket search over gas limits.
//!
//! The search keeps a bracket `[low, high]` where `high` is the smallest limit
//! seen to succeed and `low` is a limit known (or assumed) to be too small. The
//! first probe runs at the ceiling. If it succeeds, the priming strategy picks the
//! next probe from the consumed gas; afterwards every probe bisects the bracket
//! until its width falls within the configured tolerance of `high`.

use crate::{
    config::{ConfigError, EstimatorConfig},
    oracle::{Oracle, OracleError, ProbeOutcome, ProbeStatus},
    priming::{midpoint, Priming, PrimingStrategy},
    trace::{ProbeObserver, ProbeRecord},
    Gas,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contradictions that make further probing meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("bracket collapsed at {limit} but the probe still ran out of gas")]
    CollapsedBracket { limit: Gas },

    #[error("oracle reported {consumed} gas consumed with a limit of {limit}")]
    OverConsumption { limit: Gas, consumed: Gas },

    #[error("oracle ran out of gas at {limit} but reported {consumed} consumed")]
    PartialExhaustion { limit: Gas, consumed: Gas },
}

/// Errors that can occur during an estimate.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("invariant violated: {0}")]
    InvariantViolation(#[from] Violation),
}

pub type Result<T> = std::result::Result<T, EstimateError>;

/// Outcome of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Number of probes made.
    pub iterations: u32,
    /// Estimated limit. The ceiling when `status` is `Exhausted`.
    pub limit: Gas,
    /// `Success` when `limit` was seen to succeed, `Exhausted` when even the
    /// ceiling ran out of gas.
    pub status: ProbeStatus,
}

impl EstimationResult {
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

/// Working set of a single estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchState {
    low: Gas,
    mid: Gas,
    high: Gas,
    iterations: u32,
    /// Set once any probe has succeeded.
    confirmed: bool,
}

/// What to do after an exhausted probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Unsatisfiable,
}

impl SearchState {
    fn new(config: &EstimatorConfig) -> Self {
        Self {
            low: config.min_limit,
            mid: config.max_limit,
            high: config.max_limit,
            iterations: 0,
            confirmed: false,
        }
    }

    fn on_success<P: PrimingStrategy + ?Sized>(&mut self, consumed: Gas, priming: &P) {
        self.high = self.mid;

        if self.confirmed {
            self.mid = midpoint(self.low, self.high);
            return;
        }

        // First success: the consumed amount is a floor for the requirement.
        let next = priming.next_limit(consumed, self.low, self.high);
        self.low = self.low.max(consumed).min(self.high);
        self.mid = next.clamp(self.low, self.high);
        self.confirmed = true;
    }

    fn on_exhausted(&mut self) -> std::result::Result<Step, Violation> {
        if self.low == self.high {
            return Err(Violation::CollapsedBracket { limit: self.high });
        }
        // `high` has already succeeded once.
        if self.confirmed && self.mid >= self.high {
            return Err(Violation::CollapsedBracket { limit: self.mid });
        }
        if !self.confirmed {
            return Ok(Step::Unsatisfiable);
        }

        self.low = self.mid;
        self.mid = midpoint(self.mid, self.high);
        Ok(Step::Continue)
    }

    fn result(&self, status: ProbeStatus) -> EstimationResult {
        EstimationResult {
            iterations: self.iterations,
            limit: self.high,
            status,
        }
    }
}

/// Success may not use more than the limit; exhaustion uses exactly the limit.
fn check_consumption(limit: Gas, outcome: &ProbeOutcome) -> std::result::Result<(), Violation> {
    match *outcome {
        ProbeOutcome::Success { consumed } if consumed > limit => {
            Err(Violation::OverConsumption { limit, consumed })
        }
        ProbeOutcome::Exhausted { consumed } if consumed > limit => {
            Err(Violation::OverConsumption { limit, consumed })
        }
        ProbeOutcome::Exhausted { consumed } if consumed < limit => {
            Err(Violation::PartialExhaustion { limit, consumed })
        }
        _ => Ok(()),
    }
}

/// Gas limit estimator.
pub struct Estimator<O, P = Priming> {
    /// Oracle probed for every candidate limit.
    oracle: O,
    /// Validated configuration.
    config: EstimatorConfig,
    /// Strategy for the probe after the first success.
    priming: P,
}

impl<O: Oracle> Estimator<O, Priming> {
    /// Create an estimator with the default priming strategy.
    pub fn new(oracle: O, config: EstimatorConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_priming(oracle, config, Priming::default())
    }
}

impl<O: Oracle, P: PrimingStrategy> Estimator<O, P> {
    /// Create an estimator with a custom priming strategy.
    pub fn with_priming(
        oracle: O,
        config: EstimatorConfig,
        priming: P,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            oracle,
            config,
            priming,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the gas limit needed by `work`.
    pub fn estimate(&self, work: &O::Work) -> Result<EstimationResult> {
        self.estimate_traced(work, &mut |_: &ProbeRecord| {})
    }

    /// Estimate the gas limit needed by `work`, reporting every probe to `observer`.
    pub fn estimate_traced(
        &self,
        work: &O::Work,
        observer: &mut dyn ProbeObserver,
    ) -> Result<EstimationResult> {
        let _span = tracing::debug_span!("estimate", work = ?work).entered();
        let mut state = SearchState::new(&self.config);

        loop {
            let (low, mid, high) = (state.low, state.mid, state.high);
            debug_assert!(low <= mid && mid <= high, "bracket out of order");

            let outcome = self.oracle.probe(work, mid)?;
            state.iterations += 1;

            let record = ProbeRecord {
                iteration: state.iterations,
                low,
                mid,
                high,
                outcome,
            };
            tracing::debug!(
                iteration = record.iteration,
                low,
                mid,
                high,
                outcome = %outcome,
                "probe"
            );
            observer.on_probe(&record);

            if let Err(violation) = check_consumption(mid, &outcome) {
                tracing::error!(%violation, "aborting estimate");
                return Err(violation.into());
            }

            match outcome {
                ProbeOutcome::Success { consumed } => state.on_success(consumed, &self.priming),
                ProbeOutcome::Exhausted { .. } => match state.on_exhausted() {
                    Ok(Step::Continue) => {}
                    Ok(Step::Unsatisfiable) => {
                        tracing::warn!(
                            ceiling = state.high,
                            "out of gas at the ceiling, no limit suffices"
                        );
                        return Ok(state.result(ProbeStatus::Exhausted));
                    }
                    Err(violation) => {
                        tracing::error!(%violation, "aborting estimate");
                        return Err(violation.into());
                    }
                },
            }

            if self.config.is_converged(state.low, state.high) {
                tracing::info!(
                    iterations = state.iterations,
                    limit = state.high,
                    "estimate converged"
                );
                return Ok(state.result(ProbeStatus::Success));
            }
        }
    }
}
