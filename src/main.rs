//! iris-config CLI
//!
//! Checks and inspects world-model agent training configurations before a
//! run is launched.
//!
//! # Usage
//!
//! ```bash
//! # Validate a config, with overrides
//! iris-config validate configs/trainer.yaml --set common.device=cpu
//!
//! # Show the resolved config
//! iris-config info configs/trainer.yaml --format yaml
//!
//! # Start a new config from a template
//! iris-config init --template debug --output configs/debug.yaml
//!
//! # Show the epoch schedule
//! iris-config plan configs/trainer.yaml --from 48 --to 52
//! ```

use clap::Parser;
use iris_config::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
