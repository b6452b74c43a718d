//! Estimate every contract in the table.

use crate::config::DriverConfig;
use crate::report::{self, ContractReport};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gasprobe_estimator::{Estimator, ProbeRecord};
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// JSON config file with estimator settings and contracts
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every probe
    #[arg(short, long)]
    verbose: bool,

    /// Emit a JSON report instead of text
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = DriverConfig::load_or_default(args.config.as_deref())?;
    let oracle = config.oracle()?;
    let estimator = Estimator::with_priming(&oracle, config.estimator.clone(), config.priming)
        .context("Invalid estimator configuration")?;

    let show_probes = args.verbose && !args.json;
    let mut reports = Vec::with_capacity(oracle.len());

    if !args.json {
        println!(
            "{}",
            format!("Estimating {} contracts...", oracle.len()).bold().cyan()
        );
        println!();
    }

    for (index, entry) in oracle.entries().iter().enumerate() {
        let label = index.to_string();

        if !args.json {
            println!(
                "{}",
                report::header_line(&entry.name, entry.used, entry.required).bold()
            );
        }

        let mut observer = |record: &ProbeRecord| {
            if show_probes {
                report::print_probe(&label, record);
            }
        };
        let result = estimator
            .estimate_traced(&index, &mut observer)
            .with_context(|| format!("Estimating {} failed", entry.name))?;

        if !args.json {
            report::print_summary(&label, &result);
        }

        reports.push(ContractReport {
            name: entry.name.clone(),
            used: entry.used,
            required: entry.required,
            result,
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
