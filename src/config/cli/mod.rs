//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! cadencia preview run.yaml
//! cadencia preview run.yaml --format json --epochs 50
//! cadencia validate run.yaml --detailed
//! ```

mod core;
mod types;

#[cfg(test)]
mod property_tests;

pub use core::{apply_overrides, parse_args, Cli, Command, PreviewArgs, ValidateArgs};
pub use types::PreviewFormat;
