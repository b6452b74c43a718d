//! Driver configuration file.

use anyhow::{Context, Result};
use gasprobe_estimator::{EstimatorConfig, Priming, TableEntry, TableOracle};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of a `--config` JSON file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub estimator: EstimatorConfig,
    pub priming: Priming,
    /// Contracts to estimate; the reference table when empty.
    pub contracts: Vec<TableEntry>,
}

impl DriverConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: DriverConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        config
            .estimator
            .validate()
            .with_context(|| format!("Invalid estimator settings in {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            contracts = config.contracts.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Build the table oracle for the configured contracts.
    pub fn oracle(&self) -> Result<TableOracle> {
        if self.contracts.is_empty() {
            return Ok(TableOracle::reference());
        }

        let entries = self
            .contracts
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut entry = entry.clone();
                if entry.name.is_empty() {
                    entry.name = format!("contract {}", i);
                }
                entry
            })
            .collect();

        TableOracle::new(entries).context("Invalid contract table")
    }
}
