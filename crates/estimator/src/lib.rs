//! Gas limit estimation for gasprobe.
//!
//! This crate finds the smallest gas limit (within a relative tolerance) at which
//! a unit of work completes instead of running out of gas:
//! - **Oracle**: the execution capability probed with candidate limits
//! - **Priming**: the heuristic jump taken after the first successful probe
//! - **Estimator**: the bracket search driving the probes
//! - **Trace**: per-probe records for diagnostics
//!
//! # Example
//!
//! ```rust
//! use gasprobe_estimator::{Estimator, EstimatorConfig, ProbeStatus, TableOracle};
//!
//! let oracle = TableOracle::reference();
//! let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();
//!
//! let result = estimator.estimate(&3).unwrap();
//! assert_eq!(result.status, ProbeStatus::Success);
//! assert_eq!(result.limit, 1_750_000);
//! ```

pub mod config;
pub mod oracle;
pub mod priming;
pub mod search;
pub mod trace;

/// Amount of gas. Limits, consumption and bounds all use this unit.
pub type Gas = u64;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, EstimatorConfig};
pub use oracle::{Oracle, OracleError, ProbeOutcome, ProbeStatus, TableEntry, TableError, TableOracle};
pub use priming::{midpoint, Priming, PrimingStrategy};
pub use search::{EstimateError, EstimationResult, Estimator, Violation};
pub use trace::{ProbeObserver, ProbeRecord, ProbeRecorder};
