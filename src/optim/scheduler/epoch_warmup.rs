//! Epoch-granularity linear warmup

use super::{LrPolicy, LrState};
use crate::train::callback::{Phase, PhaseContext};

/// Linear warmup that treats a whole epoch as one step
///
/// The rate climbs in even steps from `warmup_initial_lr` to the initial
/// rate over `lr_warmup_epochs` epochs. Without an explicit starting rate the
/// climb starts at `initial_lr / (lr_warmup_epochs + 1)`.
///
/// Formula: lr_e = warmup_initial_lr + e * (initial_lr - warmup_initial_lr) / W
#[derive(Debug, Clone)]
pub struct EpochStepWarmupLr {
    state: LrState,
    warmup_initial_lr: f64,
    warmup_step_size: f64,
}

impl EpochStepWarmupLr {
    pub fn new(state: LrState) -> Self {
        let initial_lr = state.initial_lr();
        let warmup_epochs = state.training_params().lr_warmup_epochs;
        let warmup_initial_lr = state
            .training_params()
            .warmup_initial_lr
            .unwrap_or(initial_lr / (warmup_epochs as f64 + 1.0));
        let warmup_step_size = if warmup_epochs > 0 {
            (initial_lr - warmup_initial_lr) / warmup_epochs as f64
        } else {
            0.0
        };
        Self { state, warmup_initial_lr, warmup_step_size }
    }

    /// Rate at the first warmup epoch
    pub fn warmup_initial_lr(&self) -> f64 {
        self.warmup_initial_lr
    }

    /// Per-epoch increment
    pub fn warmup_step_size(&self) -> f64 {
        self.warmup_step_size
    }
}

impl LrPolicy for EpochStepWarmupLr {
    fn name(&self) -> &'static str {
        "EpochStepWarmupLr"
    }

    fn phase(&self) -> Phase {
        Phase::TrainEpochStart
    }

    fn state(&self) -> &LrState {
        &self.state
    }

    fn is_enabled(&self, ctx: &PhaseContext<'_>) -> bool {
        let warmup_epochs = self.state.training_params().lr_warmup_epochs;
        warmup_epochs > 0 && ctx.epoch <= warmup_epochs
    }

    fn compute(&mut self, ctx: &PhaseContext<'_>) -> f64 {
        // The last warmup epoch lands on the target exactly.
        let lr = if ctx.epoch >= self.state.training_params().lr_warmup_epochs {
            self.state.initial_lr()
        } else {
            self.warmup_initial_lr + ctx.epoch as f64 * self.warmup_step_size
        };
        self.state.set_lr(lr)
    }
}
