//! Estimate a metered step program.

use super::SearchArgs;
use crate::report;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gasprobe_estimator::{Estimator, ProbeRecord};
use gasprobe_meter::{MeteredOracle, Program, Step};

#[derive(Args)]
pub struct MeterArgs {
    /// Program steps, e.g. --step charge:21000 --step reserve:2300,refund:4800
    #[arg(short, long = "step", required = true, value_delimiter = ',')]
    steps: Vec<Step>,

    #[command(flatten)]
    search: SearchArgs,
}

pub fn run(args: MeterArgs) -> Result<()> {
    let program = Program::new(args.steps);
    let required = program.required_gas();
    let used = program.used_gas();

    let mut oracle = MeteredOracle::new();
    oracle.insert("program", program.clone());
    let estimator = Estimator::with_priming(&oracle, args.search.config(), args.search.priming())
        .context("Invalid estimator configuration")?;

    println!("{}", "Estimating metered program...".bold().cyan());
    println!("  Program:   {}", program.to_string().bright_black());
    println!("  Used:      {}", used.to_string().bright_cyan());
    println!("  Required:  {}", required.to_string().bright_cyan());
    println!();

    let verbose = args.search.verbose;
    let mut observer = |record: &ProbeRecord| {
        if verbose {
            report::print_probe("", record);
        }
    };
    let result = estimator.estimate_traced("program", &mut observer)?;

    report::print_summary("program", &result);
    if result.is_success() {
        let overshoot = result.limit.saturating_sub(required);
        println!("  Overshoot: {}", overshoot.to_string().bright_black());
    }
    Ok(())
}
