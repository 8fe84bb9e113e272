//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::PreviewFormat;
use crate::config::RunSpec;
use crate::logging::LogFormat;

/// Cadencia: learning rate schedules driven by training-loop phases
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cadencia")]
#[command(version)]
#[command(about = "Preview and validate phase-driven learning rate schedules")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Format of diagnostic log lines written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Simulate a run and print the learning rate of every epoch
    Preview(PreviewArgs),

    /// Validate a configuration file without simulating it
    Validate(ValidateArgs),
}

/// Arguments for the preview command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PreviewArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: PreviewFormat,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override initial learning rate
    #[arg(short, long)]
    pub lr: Option<f64>,

    /// Override decay mode
    #[arg(short, long)]
    pub mode: Option<String>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed configuration summary
    #[arg(short, long)]
    pub detailed: bool,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a RunSpec
pub fn apply_overrides(spec: &mut RunSpec, args: &PreviewArgs) {
    if let Some(epochs) = args.epochs {
        spec.training.max_epochs = epochs;
    }
    if let Some(lr) = args.lr {
        spec.initial_lr = lr;
    }
    if let Some(mode) = &args.mode {
        spec.schedule.lr_mode = mode.clone();
    }
}
