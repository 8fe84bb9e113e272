//! Declarative run configuration
//!
//! A YAML file describes the run (initial rate, loader length, training
//! parameters) and the schedule to drive it:
//!
//! ```yaml
//! initial_lr: 0.1
//! train_loader_len: 500
//! training:
//!   max_epochs: 100
//!   lr_warmup_epochs: 5
//! schedule:
//!   lr_mode: cosine
//!   cosine_final_lr_ratio: 0.01
//! ```

mod builder;
mod cli;
mod loader;
mod schema;
mod validate;

pub use builder::{build_callbacks, build_lr_state};
pub use cli::{
    apply_overrides, parse_args, Cli, Command, PreviewArgs, PreviewFormat, ValidateArgs,
};
pub use loader::{load_config, parse_config};
pub use schema::{RunSpec, ScheduleSpec, StageSwitchSpec, TrainingParams};
pub use validate::{validate_config, ValidationError};
