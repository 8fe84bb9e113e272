//! CLI module for cadencia
//!
//! This module contains the CLI command handlers and utilities.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::Verbosity;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
