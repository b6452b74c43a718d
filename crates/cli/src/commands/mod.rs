//! CLI commands module.

use anyhow::Result;
use clap::{Args, Subcommand};
use gasprobe_estimator::{EstimatorConfig, Gas, Priming};

mod estimate;
mod meter;
mod run;

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate every contract in the table
    Run(run::RunArgs),
    /// Estimate a single contract from its used and required gas
    Estimate(estimate::EstimateArgs),
    /// Estimate a metered step program
    Meter(meter::MeterArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Run(args) => run::run(args),
        Commands::Estimate(args) => estimate::run(args),
        Commands::Meter(args) => meter::run(args),
    }
}

/// Search settings shared by the single-contract commands.
#[derive(Args)]
pub struct SearchArgs {
    /// Floor gas limit
    #[arg(long, default_value = "21000")]
    min: Gas,

    /// Ceiling gas limit
    #[arg(long, default_value = "15000000")]
    max: Gas,

    /// Relative tolerance in percent of the returned limit
    #[arg(long, default_value = "10")]
    tolerance: u64,

    /// Bisect from the start instead of jumping near the consumed gas
    #[arg(long)]
    bisect: bool,

    /// Print every probe
    #[arg(short, long)]
    verbose: bool,
}

impl SearchArgs {
    pub fn config(&self) -> EstimatorConfig {
        EstimatorConfig::new(self.min, self.max).with_tolerance(self.tolerance)
    }

    pub fn priming(&self) -> Priming {
        if self.bisect {
            Priming::Bisect
        } else {
            Priming::default()
        }
    }
}
