//! Callbacks that drive learning rate schedulers

use super::context::PhaseContext;
use super::traits::PhaseCallback;
use crate::error::{Error, Result};
use crate::optim::{LrPolicy, MetricScheduler};

/// Callback that runs an [`LrPolicy`] at its phase
///
/// Each dispatch checks `is_enabled` first. A disabled policy neither
/// computes nor touches the optimizer, so policies with disjoint windows can
/// share a phase.
///
/// # Example
///
/// ```rust
/// use cadencia::config::TrainingParams;
/// use cadencia::optim::{CosineLr, LrState};
/// use cadencia::train::callback::{CallbackManager, Phase};
///
/// let state = LrState::new(0.1, 100, TrainingParams::default()).unwrap();
/// let mut manager = CallbackManager::new();
/// manager.register_scheduler(CosineLr::new(state, 0.01).unwrap());
/// assert_eq!(manager.callback_names(Phase::TrainBatchStep), vec!["CosineLr"]);
/// ```
pub struct LrSchedulerCallback<P: LrPolicy> {
    policy: P,
}

impl<P: LrPolicy> LrSchedulerCallback<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// The wrapped policy
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Get the last computed learning rate
    pub fn current_lr(&self) -> f64 {
        self.policy.lr()
    }
}

impl<P: LrPolicy> PhaseCallback for LrSchedulerCallback<P> {
    fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        if !self.policy.is_enabled(ctx) {
            return Ok(());
        }
        self.policy.compute(ctx);

        let epoch = ctx.epoch;
        let batch_idx = self.policy.phase().is_batch_level().then_some(ctx.batch_idx);
        let optimizer = ctx.optimizer_mut(self.policy.name())?;
        self.policy.apply(optimizer, epoch, batch_idx);
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.policy.name()
    }
}

/// Callback that steps a [`MetricScheduler`] once warmup is over
///
/// With `metric_name` set, the named metric is looked up in the context and
/// passed to the scheduler; a name the context does not carry is an
/// `IllegalMetric` error. Without a name the scheduler steps metric-free.
pub struct MetricSchedulerCallback {
    scheduler: Box<dyn MetricScheduler>,
    metric_name: Option<String>,
}

impl MetricSchedulerCallback {
    pub fn new(scheduler: Box<dyn MetricScheduler>, metric_name: Option<String>) -> Self {
        Self { scheduler, metric_name }
    }

    /// Monitor `metric_name` with `scheduler`
    pub fn monitoring<S: MetricScheduler + 'static>(
        scheduler: S,
        metric_name: impl Into<String>,
    ) -> Self {
        Self::new(Box::new(scheduler), Some(metric_name.into()))
    }

    pub fn metric_name(&self) -> Option<&str> {
        self.metric_name.as_deref()
    }
}

impl PhaseCallback for MetricSchedulerCallback {
    fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        if ctx.epoch < ctx.lr_warmup_epochs() {
            return Ok(());
        }

        let metric = match &self.metric_name {
            Some(name) => match ctx.metrics.get(name) {
                Some(value) => Some(*value),
                None => {
                    return Err(Error::IllegalMetric {
                        metric_name: name.clone(),
                        valid: ctx.metrics.keys().cloned().collect(),
                    })
                }
            },
            None => None,
        };

        let optimizer = ctx.optimizer_mut("MetricSchedulerCallback")?;
        self.scheduler.step(metric, optimizer);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MetricSchedulerCallback"
    }
}
