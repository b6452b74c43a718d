//! Execution oracle contract and the reference table oracle.
//!
//! An oracle runs a unit of work with a given gas limit and reports whether it
//! completed. The estimator relies on the oracle being monotone: once a limit
//! succeeds, every larger limit succeeds too.

use crate::Gas;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors reported by an oracle instead of a probe outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("unknown work unit: {0}")]
    UnknownWork(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;

/// Whether a probe completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Success,
    Exhausted,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Success => write!(f, "ok"),
            ProbeStatus::Exhausted => write!(f, "oog"),
        }
    }
}

/// Result of running a unit of work with one gas limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Completed. `consumed` never exceeds the probed limit.
    Success { consumed: Gas },
    /// Ran out of gas. `consumed` equals the probed limit.
    Exhausted { consumed: Gas },
}

impl ProbeOutcome {
    pub fn status(&self) -> ProbeStatus {
        match self {
            ProbeOutcome::Success { .. } => ProbeStatus::Success,
            ProbeOutcome::Exhausted { .. } => ProbeStatus::Exhausted,
        }
    }

    pub fn consumed(&self) -> Gas {
        match *self {
            ProbeOutcome::Success { consumed } | ProbeOutcome::Exhausted { consumed } => consumed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: used {}", self.status(), self.consumed())
    }
}

/// An execution capability that can be probed with gas limits.
pub trait Oracle {
    /// Identifier of a unit of work, passed through unchanged.
    type Work: ?Sized + fmt::Debug;

    /// Run `work` with `limit` gas.
    fn probe(&self, work: &Self::Work, limit: Gas) -> Result<ProbeOutcome>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    type Work = O::Work;

    fn probe(&self, work: &Self::Work, limit: Gas) -> Result<ProbeOutcome> {
        (**self).probe(work, limit)
    }
}

/// Errors building a table oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("entry {name}: used gas {used} exceeds required gas {required}")]
    UsedExceedsRequired {
        name: String,
        used: Gas,
        required: Gas,
    },
}

/// One contract in a table oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Gas reported as consumed on success.
    pub used: Gas,
    /// Smallest limit that succeeds.
    pub required: Gas,
}

impl TableEntry {
    pub fn new(name: impl Into<String>, used: Gas, required: Gas) -> Self {
        Self {
            name: name.into(),
            used,
            required,
        }
    }
}

/// Oracle backed by a fixed table of `(used, required)` thresholds.
///
/// Work units are indices into the table.
#[derive(Debug, Clone)]
pub struct TableOracle {
    entries: Vec<TableEntry>,
}

impl TableOracle {
    /// Create a table oracle, rejecting entries that could not be monotone.
    pub fn new(entries: Vec<TableEntry>) -> std::result::Result<Self, TableError> {
        if let Some(bad) = entries.iter().find(|e| e.used > e.required) {
            return Err(TableError::UsedExceedsRequired {
                name: bad.name.clone(),
                used: bad.used,
                required: bad.required,
            });
        }
        Ok(Self { entries })
    }

    /// The four reference contracts.
    pub fn reference() -> Self {
        Self {
            entries: vec![
                TableEntry::new("contract 0", 24_000, 24_000),
                TableEntry::new("contract 1", 30_000, 100_000),
                TableEntry::new("contract 2", 23_000, 28_000),
                TableEntry::new("contract 3", 1_400_000, 1_750_000),
            ],
        }
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TableEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Oracle for TableOracle {
    type Work = usize;

    fn probe(&self, work: &usize, limit: Gas) -> Result<ProbeOutcome> {
        let entry = self
            .entries
            .get(*work)
            .ok_or_else(|| OracleError::UnknownWork(work.to_string()))?;

        if limit >= entry.required {
            Ok(ProbeOutcome::Success {
                consumed: entry.used,
            })
        } else {
            Ok(ProbeOutcome::Exhausted { consumed: limit })
        }
    }
}
