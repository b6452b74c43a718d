//! Step programs.

use crate::gas::{GasMeter, MAX_REFUND_QUOTIENT};
use gasprobe_estimator::{Gas, ProbeOutcome};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseStepError {
    #[error("expected <kind>:<amount>, got {0:?}")]
    MissingAmount(String),

    #[error("unknown step kind {0:?} (expected charge, reserve or refund)")]
    UnknownKind(String),

    #[error("invalid gas amount {input:?}: {source}")]
    InvalidAmount {
        input: String,
        source: ParseIntError,
    },
}

/// A single metered operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Consume gas.
    Charge(Gas),
    /// Require headroom without consuming it (a call stipend).
    Reserve(Gas),
    /// Accrue a refund (storage cleared).
    Refund(Gas),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Charge(n) => write!(f, "charge:{}", n),
            Step::Reserve(n) => write!(f, "reserve:{}", n),
            Step::Refund(n) => write!(f, "refund:{}", n),
        }
    }
}

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, amount) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParseStepError::MissingAmount(s.to_string()))?;

        let amount = amount
            .trim()
            .replace('_', "")
            .parse::<Gas>()
            .map_err(|source| ParseStepError::InvalidAmount {
                input: amount.to_string(),
                source,
            })?;

        match kind.trim() {
            "charge" => Ok(Step::Charge(amount)),
            "reserve" => Ok(Step::Reserve(amount)),
            "refund" => Ok(Step::Refund(amount)),
            other => Err(ParseStepError::UnknownKind(other.to_string())),
        }
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    steps: Vec<Step>,
}

impl Program {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the program with `limit` gas.
    ///
    /// Running out of gas burns the whole limit.
    pub fn run(&self, limit: Gas) -> ProbeOutcome {
        let mut meter = GasMeter::new(limit);

        for step in &self.steps {
            let result = match *step {
                Step::Charge(amount) => meter.consume(amount),
                Step::Reserve(amount) => meter.ensure_available(amount),
                Step::Refund(amount) => {
                    meter.refund(amount);
                    Ok(())
                }
            };

            if let Err(err) = result {
                tracing::trace!(%err, %step, limit, "program aborted");
                return ProbeOutcome::Exhausted { consumed: limit };
            }
        }

        ProbeOutcome::Success {
            consumed: meter.net_used(),
        }
    }

    /// Smallest limit at which [`Program::run`] succeeds.
    pub fn required_gas(&self) -> Gas {
        let mut charged: Gas = 0;
        let mut peak: Gas = 0;

        for step in &self.steps {
            match *step {
                Step::Charge(amount) => {
                    charged = charged.saturating_add(amount);
                    peak = peak.max(charged);
                }
                Step::Reserve(amount) => peak = peak.max(charged.saturating_add(amount)),
                Step::Refund(_) => {}
            }
        }

        peak
    }

    /// Gas reported as consumed by a successful run.
    pub fn used_gas(&self) -> Gas {
        let (charged, refund) = self
            .steps
            .iter()
            .fold((0 as Gas, 0 as Gas), |(charged, refund), step| match *step {
                Step::Charge(n) => (charged.saturating_add(n), refund),
                Step::Refund(n) => (charged, refund.saturating_add(n)),
                Step::Reserve(_) => (charged, refund),
            });

        charged - refund.min(charged / MAX_REFUND_QUOTIENT)
    }
}

impl FromStr for Program {
    type Err = ParseStepError;

    /// Parse a comma-separated list of steps, e.g. `charge:21000,reserve:2300`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Step>, _>>()
            .map(Program::new)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
