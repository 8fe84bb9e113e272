//! Step (milestone) decay learning rate scheduler

use super::{LrPolicy, LrState};
use crate::error::{Error, Result};
use crate::train::callback::{Phase, PhaseContext};

/// Step Decay Learning Rate Scheduler
///
/// Multiplies the initial rate by `lr_decay_factor` once for every milestone
/// already reached. Milestones are either listed explicitly or derived every
/// `step_lr_update_freq` epochs inside `[warmup, max - cooldown)`.
///
/// Formula: lr_e = initial_lr * gamma^(|{m in milestones : m <= e}|)
#[derive(Debug, Clone)]
pub struct StepLr {
    state: LrState,
    lr_updates: Vec<usize>,
    lr_decay_factor: f64,
}

impl StepLr {
    /// Create a new step decay scheduler
    ///
    /// # Arguments
    /// * `lr_updates` - Explicit milestone epochs
    /// * `lr_decay_factor` - Multiplicative factor (e.g., 0.1 for 10x reduction)
    /// * `step_lr_update_freq` - Derive milestones every `k` epochs instead
    ///
    /// # Errors
    /// Returns `ConflictingArguments` when both milestones and a frequency are
    /// supplied.
    pub fn new(
        state: LrState,
        lr_updates: Vec<usize>,
        lr_decay_factor: f64,
        step_lr_update_freq: Option<f64>,
    ) -> Result<Self> {
        let freq = step_lr_update_freq.filter(|f| *f > 0.0);
        if freq.is_some() && !lr_updates.is_empty() {
            return Err(Error::ConflictingArguments {
                policy: "StepLr",
                first: "lr_updates",
                second: "step_lr_update_freq",
            });
        }

        let params = state.training_params();
        let lr_updates = match freq {
            Some(freq) => derive_milestones(freq, params.lr_warmup_epochs, params.post_warmup_epochs()),
            None => {
                if params.lr_cooldown_epochs > 0 {
                    state.logger().warn(
                        "Specific lr_updates were passed along with lr_cooldown_epochs > 0, \
                         cooldown will have no effect.",
                    );
                }
                lr_updates
            }
        };

        Ok(Self { state, lr_updates, lr_decay_factor })
    }

    /// Milestone epochs in effect
    pub fn lr_updates(&self) -> &[usize] {
        &self.lr_updates
    }
}

/// Milestones `ceil(freq * x)` for `x = 1, 2, ...` that fall in
/// `[warmup_epochs, max_epochs)`
fn derive_milestones(freq: f64, warmup_epochs: usize, max_epochs: usize) -> Vec<usize> {
    (1..max_epochs)
        .map(|x| (freq * x as f64).ceil() as usize)
        .filter(|&m| warmup_epochs <= m && m < max_epochs)
        .collect()
}

impl LrPolicy for StepLr {
    fn name(&self) -> &'static str {
        "StepLr"
    }

    fn phase(&self) -> Phase {
        Phase::TrainEpochEnd
    }

    fn state(&self) -> &LrState {
        &self.state
    }

    fn is_enabled(&self, ctx: &PhaseContext<'_>) -> bool {
        self.state.training_params().lr_warmup_epochs <= ctx.epoch
    }

    fn compute(&mut self, ctx: &PhaseContext<'_>) -> f64 {
        let passed = self.lr_updates.iter().filter(|&&m| m <= ctx.epoch).count();
        let lr = self.state.initial_lr() * self.lr_decay_factor.powi(passed as i32);
        self.state.set_lr(lr)
    }
}
