//! Cadencia: phase-driven callbacks and learning rate schedules
//!
//! A training loop dispatches named phases (epoch start, batch step,
//! validation end, ...) through a [`CallbackManager`]. Callbacks bound to a
//! phase run in registration order and may adjust the optimizer's learning
//! rates, step metric-driven schedulers, or switch training stages.
//!
//! # Modules
//!
//! - [`train::callback`]: phases, context, the manager and built-in callbacks
//! - [`optim`]: the optimizer boundary and learning rate policies
//! - [`config`]: YAML run specifications, validation and callback building
//! - [`train::simulate`]: model-free simulation of a configured run
//! - [`logging`]: the injected logging capability and `tracing` setup
//!
//! # Example
//!
//! ```rust
//! use cadencia::config::{build_callbacks, parse_config};
//! use cadencia::logging::default_logger;
//! use cadencia::optim::ScheduleFnRegistry;
//! use cadencia::train::simulate_run;
//!
//! let spec = parse_config(
//!     "initial_lr: 0.1\ntrain_loader_len: 10\ntraining:\n  max_epochs: 30\nschedule:\n  lr_mode: step\n  lr_updates: [10, 20]\n",
//! )?;
//! let mut manager = build_callbacks(&spec, &ScheduleFnRegistry::new(), None, default_logger())?;
//! let samples = simulate_run(&spec, &mut manager)?;
//! assert!((samples[25].lr - 0.001).abs() < 1e-12);
//! # Ok::<(), cadencia::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
pub use optim::{LrMode, LrPolicy, LrState};
pub use train::callback::{CallbackManager, Phase, PhaseCallback, PhaseContext};
