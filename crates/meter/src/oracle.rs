//! Oracle backed by metered step programs.

use crate::program::Program;
use gasprobe_estimator::{Gas, Oracle, OracleError, ProbeOutcome};
use std::collections::BTreeMap;

/// Named programs, probed by running them with the requested limit.
#[derive(Debug, Clone, Default)]
pub struct MeteredOracle {
    programs: BTreeMap<String, Program>,
}

impl MeteredOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, program: Program) -> Option<Program> {
        self.programs.insert(name.into(), program)
    }

    /// Names of all registered programs, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }
}

impl Oracle for MeteredOracle {
    type Work = str;

    fn probe(&self, work: &str, limit: Gas) -> Result<ProbeOutcome, OracleError> {
        let program = self
            .programs
            .get(work)
            .ok_or_else(|| OracleError::UnknownWork(work.to_string()))?;
        Ok(program.run(limit))
    }
}
