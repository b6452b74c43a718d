//! Console and JSON output.

use colored::Colorize;
use gasprobe_estimator::{EstimationResult, Gas, ProbeRecord, ProbeStatus};
use serde::Serialize;

/// One estimated contract, as emitted by `run --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub name: String,
    pub used: Gas,
    pub required: Gas,
    #[serde(flatten)]
    pub result: EstimationResult,
}

pub fn header_line(name: &str, used: Gas, required: Gas) -> String {
    format!("========== {}: gas {}, required: {}", name, used, required)
}

pub fn probe_line(label: &str, record: &ProbeRecord) -> String {
    format!("probe {}{}", label, record)
}

pub fn summary_line(label: &str, result: &EstimationResult) -> String {
    format!(
        "{}: gas {}, iterations: {}: {}",
        label, result.limit, result.iterations, result.status
    )
}

pub fn print_probe(label: &str, record: &ProbeRecord) {
    let line = probe_line(label, record);
    match record.outcome.status() {
        ProbeStatus::Success => println!("  {}", line.bright_black()),
        ProbeStatus::Exhausted => println!("  {}", line.yellow()),
    }
}

pub fn print_summary(label: &str, result: &EstimationResult) {
    let line = summary_line(label, result);
    match result.status {
        ProbeStatus::Success => println!("{}  {}", "✓".green().bold(), line),
        ProbeStatus::Exhausted => println!("{}  {}", "✗".red().bold(), line.red()),
    }
}
