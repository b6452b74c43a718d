//! Gas metering.

use gasprobe_estimator::Gas;
use thiserror::Error;

/// Refunds are capped at `used / MAX_REFUND_QUOTIENT`.
pub const MAX_REFUND_QUOTIENT: u64 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeterError {
    #[error("Out of gas: required {required}, remaining {remaining}")]
    OutOfGas { required: Gas, remaining: Gas },
}

/// Gas meter tracks remaining gas and accrued refunds.
#[derive(Debug, Clone)]
pub struct GasMeter {
    remaining: Gas,
    used: Gas,
    refund: Gas,
}

impl GasMeter {
    pub fn new(limit: Gas) -> Self {
        Self {
            remaining: limit,
            used: 0,
            refund: 0,
        }
    }

    /// Consume gas, returning error if insufficient.
    pub fn consume(&mut self, amount: Gas) -> Result<(), MeterError> {
        self.ensure_available(amount)?;
        self.remaining -= amount;
        self.used += amount;
        Ok(())
    }

    /// Require `amount` of headroom without consuming it.
    pub fn ensure_available(&self, amount: Gas) -> Result<(), MeterError> {
        if self.remaining < amount {
            return Err(MeterError::OutOfGas {
                required: amount,
                remaining: self.remaining,
            });
        }
        Ok(())
    }

    /// Accrue a refund, paid out when execution finishes.
    pub fn refund(&mut self, amount: Gas) {
        self.refund = self.refund.saturating_add(amount);
    }

    pub fn remaining(&self) -> Gas {
        self.remaining
    }

    pub fn used(&self) -> Gas {
        self.used
    }

    /// Gas charged after applying the capped refund.
    pub fn net_used(&self) -> Gas {
        self.used - self.refund.min(self.used / MAX_REFUND_QUOTIENT)
    }
}
