//! Metered execution for gasprobe.
//!
//! A program is a list of gas steps run against a [`GasMeter`]. Running out of gas
//! aborts the program; stipend checks and refunds make the required limit differ
//! from the gas finally charged, as with real contract calls.

pub mod gas;
pub mod oracle;
pub mod program;

pub use gas::{GasMeter, MeterError, MAX_REFUND_QUOTIENT};
pub use oracle::MeteredOracle;
pub use program::{ParseStepError, Program, Step};
