//! # Loadgen CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - Manual batch dispatch and synthetic load runs
//! - Graceful shutdown on Ctrl+C / SIGTERM

mod cli;
mod commands;
mod error;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_load, run_manual, run_validate};
use observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_observability(&cli) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Loadgen starting");

    let result = match &cli.command {
        Commands::Manual(args) => run_manual(args).await,
        Commands::Load(args) => run_load(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn init_observability(cli: &Cli) -> Result<()> {
    let config = ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        ..ObservabilityConfig::from_verbosity(cli.verbose, cli.quiet)
    };
    observability::init_with_config(config)
}
