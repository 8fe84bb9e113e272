//! Polynomial decay learning rate scheduler

use super::{LrPolicy, LrState};
use crate::error::{Error, Result};
use crate::train::callback::{Phase, PhaseContext};

const POLY_POWER: f64 = 0.9;

/// Polynomial decay over the decay window, normalized by batch accumulation
///
/// Formula: lr = initial_lr * (1 - t / T)^0.9 where
/// t = (L * (e - W) + b) / A and T = L * (M - W - C) / A
#[derive(Debug, Clone)]
pub struct PolyLr {
    state: LrState,
    max_iter: f64,
}

impl PolyLr {
    /// # Errors
    /// Returns `InvalidParameter` when warmup and cooldown leave no epochs to
    /// decay over.
    pub fn new(state: LrState) -> Result<Self> {
        let params = state.training_params();
        let decay_epochs = params.decay_epochs();
        if decay_epochs <= 0 {
            return Err(Error::InvalidParameter {
                field: "max_epochs",
                message: format!(
                    "poly decay needs max_epochs ({}) > lr_warmup_epochs ({}) + lr_cooldown_epochs ({})",
                    params.max_epochs, params.lr_warmup_epochs, params.lr_cooldown_epochs
                ),
            });
        }
        let max_iter = state.train_loader_len() as f64 * decay_epochs as f64
            / params.batch_accumulate as f64;
        Ok(Self { state, max_iter })
    }
}

impl LrPolicy for PolyLr {
    fn name(&self) -> &'static str {
        "PolyLr"
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
        let accumulate = self.state.training_params().batch_accumulate as f64;
        let current_iter = self.state.iters_since_warmup(ctx.epoch, ctx.batch_idx) / accumulate;
        let lr = self.state.initial_lr() * (1.0 - current_iter / self.max_iter).powf(POLY_POWER);
        self.state.set_lr(lr)
    }
}
