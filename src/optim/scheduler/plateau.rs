//! Metric-driven scheduling

use crate::optim::Optimizer;

/// A scheduler stepped once per dispatch, optionally with a monitored metric
pub trait MetricScheduler: Send {
    /// Advance the scheduler, adjusting the optimizer's rate if needed
    fn step(&mut self, metric: Option<f64>, optimizer: &mut dyn Optimizer);

    /// Scheduler name for logging
    fn name(&self) -> &'static str {
        "MetricScheduler"
    }
}

/// Whether lower or higher metric values count as improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateauMode {
    /// Lower is better (e.g. loss)
    Min,
    /// Higher is better (e.g. accuracy)
    Max,
}

/// Reduce the learning rate when a monitored metric stops improving
///
/// After `patience` consecutive steps without improvement by more than
/// `threshold`, every group's rate is multiplied by `factor`, never going
/// below `min_lr`. Steps without a metric only advance the step counter.
#[derive(Debug, Clone)]
pub struct ReduceLrOnPlateau {
    mode: PlateauMode,
    factor: f64,
    patience: usize,
    threshold: f64,
    min_lr: f64,
    best: f64,
    num_bad_steps: usize,
    steps: usize,
}

impl ReduceLrOnPlateau {
    pub fn new(mode: PlateauMode, factor: f64, patience: usize) -> Self {
        let best = match mode {
            PlateauMode::Min => f64::INFINITY,
            PlateauMode::Max => f64::NEG_INFINITY,
        };
        Self {
            mode,
            factor,
            patience,
            threshold: 1e-4,
            min_lr: 0.0,
            best,
            num_bad_steps: 0,
            steps: 0,
        }
    }

    /// Set the minimum improvement that resets patience
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the floor for reduced rates
    pub fn with_min_lr(mut self, min_lr: f64) -> Self {
        self.min_lr = min_lr;
        self
    }

    /// Best metric seen so far
    pub fn best(&self) -> f64 {
        self.best
    }

    /// Number of steps taken, with or without a metric
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn is_better(&self, metric: f64) -> bool {
        match self.mode {
            PlateauMode::Min => metric < self.best - self.threshold,
            PlateauMode::Max => metric > self.best + self.threshold,
        }
    }

    fn reduce(&self, optimizer: &mut dyn Optimizer) {
        for group in optimizer.param_groups_mut() {
            group.lr = (group.lr * self.factor).max(self.min_lr);
        }
    }
}

impl MetricScheduler for ReduceLrOnPlateau {
    fn step(&mut self, metric: Option<f64>, optimizer: &mut dyn Optimizer) {
        self.steps += 1;
        let Some(metric) = metric else {
            return;
        };

        if self.is_better(metric) {
            self.best = metric;
            self.num_bad_steps = 0;
        } else {
            self.num_bad_steps += 1;
        }

        if self.num_bad_steps >= self.patience {
            self.reduce(optimizer);
            self.num_bad_steps = 0;
        }
    }

    fn name(&self) -> &'static str {
        "ReduceLrOnPlateau"
    }
}
