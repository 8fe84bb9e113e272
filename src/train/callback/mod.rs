//! Phase callback system for the training loop
//!
//! The loop dispatches named [`Phase`]s; callbacks registered for a phase
//! run in registration order against a [`PhaseContext`]:
//! - [`LrSchedulerCallback`] runs a learning rate policy
//! - [`MetricSchedulerCallback`] steps a metric-driven scheduler
//! - [`StageSwitchCallback`] applies a one-shot stage change
//! - [`LrRecorder`] / [`ContextRecorder`] observe without changing anything
//!
//! # Example
//!
//! ```rust
//! use cadencia::train::callback::{CallbackManager, Phase, PhaseCallback, PhaseContext};
//!
//! struct PrintCallback;
//!
//! impl PhaseCallback for PrintCallback {
//!     fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> cadencia::Result<()> {
//!         println!("epoch {} finished", ctx.epoch);
//!         Ok(())
//!     }
//! }
//!
//! let mut manager = CallbackManager::new();
//! manager.register(Phase::TrainEpochEnd, PrintCallback);
//! manager.dispatch(Phase::TrainEpochEnd, &mut PhaseContext::new(0, 0)).unwrap();
//! ```

mod context;
mod manager;
mod phase;
mod recorder;
mod scheduler;
mod stage_switch;
mod traits;

pub use context::{Criterion, DataLoader, PhaseContext, Transform};
pub use manager::CallbackManager;
pub use phase::Phase;
pub use recorder::{ContextRecorder, ContextSnapshot, LrRecorder};
pub use scheduler::{LrSchedulerCallback, MetricSchedulerCallback};
pub use stage_switch::{
    DetectionStageSwitch, StageChange, StageSwitchCallback, SwitchState,
    DEFAULT_DETECTION_SWITCH_EPOCH,
};
pub use traits::PhaseCallback;
