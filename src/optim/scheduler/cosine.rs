//! Cosine annealing learning rate scheduler

use super::{LrPolicy, LrState};
use crate::error::{Error, Result};
use crate::train::callback::{Phase, PhaseContext};
use std::f64::consts::PI;

/// Cosine Annealing Learning Rate Scheduler
///
/// Decays from the initial rate to `initial_lr * cosine_final_lr_ratio` over
/// the decay window. When step-level warmup is configured the curve starts
/// after `lr_warmup_steps` batches instead of at the end of epoch warmup.
///
/// Formula: lr_t = 0.5 * lr0 * (1 + cos(π * t / (T + 1))) * (1 - r) + lr0 * r
///
/// Where:
/// - t = max(0, L * (e - W) + b - lr_warmup_steps)
/// - T = L * (M - W - C) - lr_warmup_steps
/// - r is the final ratio
#[derive(Debug, Clone)]
pub struct CosineLr {
    state: LrState,
    cosine_final_lr_ratio: f64,
}

impl CosineLr {
    /// # Errors
    /// Returns `InvalidParameter` when `lr_warmup_steps` consumes the whole
    /// decay window, leaving `T + 1 <= 0`.
    pub fn new(state: LrState, cosine_final_lr_ratio: f64) -> Result<Self> {
        let policy = Self { state, cosine_final_lr_ratio };
        if policy.total_steps() + 1.0 <= 0.0 {
            let params = policy.state.training_params();
            return Err(Error::InvalidParameter {
                field: "lr_warmup_steps",
                message: format!(
                    "cosine decay needs lr_warmup_steps ({}) < train_loader_len ({}) x decay epochs ({}) + 1",
                    params.lr_warmup_steps,
                    policy.state.train_loader_len(),
                    params.decay_epochs()
                ),
            });
        }
        Ok(policy)
    }

    /// Closed-form cosine rate at `step` of `total_steps`
    pub fn compute_learning_rate(
        step: f64,
        total_steps: f64,
        initial_lr: f64,
        final_lr_ratio: f64,
    ) -> f64 {
        let lr = 0.5 * initial_lr * (1.0 + (step / (total_steps + 1.0) * PI).cos());
        lr * (1.0 - final_lr_ratio) + initial_lr * final_lr_ratio
    }

    fn total_steps(&self) -> f64 {
        let params = self.state.training_params();
        self.state.train_loader_len() as f64 * params.decay_epochs() as f64
            - params.lr_warmup_steps as f64
    }
}

impl LrPolicy for CosineLr {
    fn name(&self) -> &'static str {
        "CosineLr"
    }

    fn phase(&self) -> Phase {
        Phase::TrainBatchStep
    }

    fn state(&self) -> &LrState {
        &self.state
    }

    fn is_enabled(&self, ctx: &PhaseContext<'_>) -> bool {
        let params = self.state.training_params();
        if params.lr_warmup_steps > 0 {
            return self.state.global_step(ctx.epoch, ctx.batch_idx) >= params.lr_warmup_steps;
        }
        params.in_decay_window(ctx.epoch)
    }

    fn compute(&mut self, ctx: &PhaseContext<'_>) -> f64 {
        let warmup_steps = self.state.training_params().lr_warmup_steps as f64;
        let current_iter =
            (self.state.iters_since_warmup(ctx.epoch, ctx.batch_idx) - warmup_steps).max(0.0);
        let lr = Self::compute_learning_rate(
            current_iter,
            self.total_steps(),
            self.state.initial_lr(),
            self.cosine_final_lr_ratio,
        );
        self.state.set_lr(lr)
    }
}
