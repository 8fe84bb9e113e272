//! User-defined schedule function

use super::{LrPolicy, LrState};
use crate::error::{Error, Result};
use crate::train::callback::{Phase, PhaseContext};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name reported when the `function` mode has no `lr_schedule_function`
const UNSET_FUNCTION_NAME: &str = "<unset>";

/// Arguments passed to a user schedule function
///
/// `epoch` and `max_epoch` are already adjusted for warmup and cooldown, so
/// the function sees the decay window as starting at epoch 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleFnArgs {
    pub initial_lr: f64,
    pub epoch: usize,
    pub iter: usize,
    pub max_epoch: usize,
    pub iters_per_epoch: usize,
}

/// Pure schedule function `f(args) -> lr`
pub type ScheduleFn = Arc<dyn Fn(ScheduleFnArgs) -> f64 + Send + Sync>;

/// Learning rate from a user-supplied function, evaluated every batch step
/// inside the decay window
#[derive(Clone)]
pub struct FunctionLr {
    state: LrState,
    lr_schedule_function: ScheduleFn,
}

impl FunctionLr {
    pub fn new(state: LrState, lr_schedule_function: ScheduleFn) -> Self {
        Self { state, lr_schedule_function }
    }

    /// Build from the function registered under `name`
    ///
    /// # Errors
    /// Returns `MissingScheduleFunction` listing the registered names when
    /// `name` is unset or not registered.
    pub fn from_registry(
        state: LrState,
        registry: &ScheduleFnRegistry,
        name: Option<&str>,
    ) -> Result<Self> {
        let function = match name {
            Some(name) => registry.get(name)?,
            None => {
                return Err(Error::MissingScheduleFunction {
                    name: UNSET_FUNCTION_NAME.to_string(),
                    available: registry.names(),
                })
            }
        };
        Ok(Self::new(state, function))
    }
}

impl fmt::Debug for FunctionLr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionLr").field("state", &self.state).finish_non_exhaustive()
    }
}

impl LrPolicy for FunctionLr {
    fn name(&self) -> &'static str {
        "FunctionLr"
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
        let params = self.state.training_params();
        let args = ScheduleFnArgs {
            initial_lr: self.state.initial_lr(),
            epoch: ctx.epoch.saturating_sub(params.lr_warmup_epochs),
            iter: ctx.batch_idx,
            max_epoch: params.decay_epochs().max(0) as usize,
            iters_per_epoch: self.state.train_loader_len(),
        };
        let lr = (self.lr_schedule_function)(args);
        self.state.set_lr(lr)
    }
}

/// Named schedule functions available to configuration files
///
/// # Example
///
/// ```rust
/// use cadencia::optim::ScheduleFnRegistry;
///
/// let mut registry = ScheduleFnRegistry::new();
/// registry.register("halve_each_epoch", |args| args.initial_lr * 0.5f64.powi(args.epoch as i32));
/// assert!(registry.get("halve_each_epoch").is_ok());
/// assert!(registry.get("missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ScheduleFnRegistry {
    functions: BTreeMap<String, ScheduleFn>,
}

impl ScheduleFnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in functions
    ///
    /// - `constant`: `initial_lr` throughout the decay window
    /// - `linear_decay`: linear decay from `initial_lr` to zero over the window
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("constant", |args| args.initial_lr);
        registry.register("linear_decay", |args| {
            let total = args.max_epoch * args.iters_per_epoch;
            if total == 0 {
                return args.initial_lr;
            }
            let done = args.epoch * args.iters_per_epoch + args.iter;
            args.initial_lr * (1.0 - done as f64 / total as f64).max(0.0)
        });
        registry
    }

    /// Register `function` under `name`, replacing any previous entry
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(ScheduleFnArgs) -> f64 + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }

    /// Look up a function by name
    ///
    /// # Errors
    /// Returns `MissingScheduleFunction` listing the registered names.
    pub fn get(&self, name: &str) -> Result<ScheduleFn> {
        self.functions.get(name).cloned().ok_or_else(|| Error::MissingScheduleFunction {
            name: name.to_string(),
            available: self.names(),
        })
    }
}

impl fmt::Debug for ScheduleFnRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleFnRegistry").field("functions", &self.names()).finish()
    }
}
