//! CLI command implementations

mod preview;
mod validate;


use crate::cli::Verbosity;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Preview(args) => preview::run_preview(args, verbosity),
        Command::Validate(args) => validate::run_validate(args, verbosity),
    }
}
