//! Estimate a single ad-hoc contract.

use super::SearchArgs;
use crate::report;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gasprobe_estimator::{Estimator, Gas, ProbeRecord, TableEntry, TableOracle};

#[derive(Args)]
pub struct EstimateArgs {
    /// Gas the call reports as consumed when it succeeds
    #[arg(short, long)]
    used: Gas,

    /// Smallest gas limit at which the call succeeds
    #[arg(short, long)]
    required: Gas,

    #[command(flatten)]
    search: SearchArgs,
}

pub fn run(args: EstimateArgs) -> Result<()> {
    let oracle = TableOracle::new(vec![TableEntry::new("contract", args.used, args.required)])
        .context("Invalid contract")?;
    let estimator = Estimator::with_priming(&oracle, args.search.config(), args.search.priming())
        .context("Invalid estimator configuration")?;

    println!("{}", "Estimating gas...".bold().cyan());
    println!("  Used:      {}", args.used.to_string().bright_cyan());
    println!("  Required:  {}", args.required.to_string().bright_cyan());
    println!();

    let verbose = args.search.verbose;
    let mut observer = |record: &ProbeRecord| {
        if verbose {
            report::print_probe("", record);
        }
    };
    let result = estimator.estimate_traced(&0, &mut observer)?;

    report::print_summary("contract", &result);
    Ok(())
}
