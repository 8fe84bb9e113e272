//! Batch-granularity linear warmup

use super::{LrPolicy, LrState};
use crate::train::callback::{Phase, PhaseContext};

/// Linear warmup over the first `lr_warmup_steps` batches
///
/// The rates are precomputed as an evenly spaced sequence from
/// `warmup_initial_lr` to `initial_lr`, both ends included, and indexed by
/// the global step. Warmup is capped to one epoch so it never overlaps an
/// epoch-level scheduler; capping is reported as a warning.
#[derive(Debug, Clone)]
pub struct BatchStepLinearWarmupLr {
    state: LrState,
    lr_warmup_steps: usize,
    learning_rates: Vec<f64>,
}

impl BatchStepLinearWarmupLr {
    pub fn new(state: LrState, warmup_initial_lr: f64, lr_warmup_steps: usize) -> Self {
        let train_loader_len = state.train_loader_len();
        if lr_warmup_steps > train_loader_len {
            state.logger().warn(&format!(
                "Number of warmup steps ({lr_warmup_steps}) is greater than number of steps in epoch \
                 ({train_loader_len}). Warmup steps will be capped to number of steps in epoch to \
                 avoid interfering with any pre-epoch LR schedulers."
            ));
        }
        let lr_warmup_steps = lr_warmup_steps.min(train_loader_len);
        let learning_rates = linspace(warmup_initial_lr, state.initial_lr(), lr_warmup_steps);
        Self { state, lr_warmup_steps, learning_rates }
    }

    /// Effective warmup length after capping
    pub fn lr_warmup_steps(&self) -> usize {
        self.lr_warmup_steps
    }

    /// The precomputed warmup rates
    pub fn learning_rates(&self) -> &[f64] {
        &self.learning_rates
    }
}

impl LrPolicy for BatchStepLinearWarmupLr {
    fn name(&self) -> &'static str {
        "BatchStepLinearWarmupLr"
    }

    fn phase(&self) -> Phase {
        Phase::TrainBatchStart
    }

    fn state(&self) -> &LrState {
        &self.state
    }

    fn is_enabled(&self, ctx: &PhaseContext<'_>) -> bool {
        self.state.global_step(ctx.epoch, ctx.batch_idx) < self.lr_warmup_steps
    }

    fn compute(&mut self, ctx: &PhaseContext<'_>) -> f64 {
        let step = self.state.global_step(ctx.epoch, ctx.batch_idx);
        let lr = match self.learning_rates.get(step) {
            Some(&lr) => lr,
            None => self.state.initial_lr(),
        };
        self.state.set_lr(lr)
    }
}

/// `num` evenly spaced values over `[start, stop]`, endpoint included
fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}
