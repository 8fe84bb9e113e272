//! Exponential decay learning rate scheduler

use super::{LrPolicy, LrState};
use crate::train::callback::{Phase, PhaseContext};

/// Exponential decay by `lr_decay_factor` per epoch, interpolated per batch
///
/// Formula: lr = initial_lr * gamma^((L * (e - W) + b) / L)
#[derive(Debug, Clone)]
pub struct ExponentialLr {
    state: LrState,
    lr_decay_factor: f64,
}

impl ExponentialLr {
    pub fn new(state: LrState, lr_decay_factor: f64) -> Self {
        Self { state, lr_decay_factor }
    }
}

impl LrPolicy for ExponentialLr {
    fn name(&self) -> &'static str {
        "ExponentialLr"
    }

    fn phase(&self) -> Phase {
        Phase::TrainBatchStep
    }

    fn state(&self) -> &LrState {
        &self.state
    }

    fn is_enabled(&self, ctx: &PhaseContext<'_>) -> bool {
        self.state.training_params().in_decay_window(ctx.epoch)
    }

    fn compute(&mut self, ctx: &PhaseContext<'_>) -> f64 {
        let current_iter = self.state.iters_since_warmup(ctx.epoch, ctx.batch_idx);
        let exponent = current_iter / self.state.train_loader_len() as f64;
        let lr = self.state.initial_lr() * self.lr_decay_factor.powf(exponent);
        self.state.set_lr(lr)
    }
}
