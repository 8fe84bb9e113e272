//! Cadencia CLI
//!
//! Preview and validate learning rate schedules without a model.
//!
//! # Usage
//!
//! ```bash
//! # Print the learning rate of every epoch
//! cadencia preview run.yaml
//!
//! # Same, as JSON, with overrides
//! cadencia preview run.yaml --format json --epochs 50 --lr 0.01
//!
//! # Validate config
//! cadencia validate run.yaml --detailed
//! ```

use cadencia::cli::{run_command, Cli, Verbosity};
use cadencia::logging::init_tracing;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    if let Err(e) = init_tracing(verbosity.tracing_level(), cli.log_format) {
        eprintln!("Warning: {e}");
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
