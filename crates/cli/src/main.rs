//! gasprobe CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod report;

#[derive(Parser)]
#[command(name = "gasprobe")]
#[command(about = "Estimate the gas limit a contract call needs", long_about = None)]
struct Cli {
    /// Log filter, used when RUST_LOG is unset (e.g. "debug" to log every probe)
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("gasprobe - gas limit estimation");
            println!("Run 'gasprobe --help' for usage information.");
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
