//! Learning rate scheduling policies
//!
//! Every policy is a closed-form function of `(epoch, batch_idx)` plus
//! constants fixed at construction, so recomputing at any point yields the
//! same rate:
//! - `EpochStepWarmupLr` - linear warmup, one step per epoch
//! - `BatchStepLinearWarmupLr` - linear warmup, one step per batch
//! - `StepLr` - multiplicative decay at milestone epochs
//! - `ExponentialLr` - continuous per-batch exponential decay
//! - `PolyLr` - polynomial decay with exponent 0.9
//! - `CosineLr` - cosine annealing to a final ratio of the initial rate
//! - `FunctionLr` - user-supplied schedule function
//!
//! `ReduceLrOnPlateau` is metric-driven and lives behind the separate
//! [`MetricScheduler`] trait.

mod batch_warmup;
mod cosine;
mod epoch_warmup;
mod exponential;
mod function;
mod plateau;
mod polynomial;
mod step_decay;


pub use batch_warmup::BatchStepLinearWarmupLr;
pub use cosine::CosineLr;
pub use epoch_warmup::EpochStepWarmupLr;
pub use exponential::ExponentialLr;
pub use function::{FunctionLr, ScheduleFn, ScheduleFnArgs, ScheduleFnRegistry};
pub use plateau::{MetricScheduler, PlateauMode, ReduceLrOnPlateau};
pub use polynomial::PolyLr;
pub use step_decay::StepLr;

use crate::config::TrainingParams;
use crate::error::{Error, Result};
use crate::logging::{default_logger, SharedLogger};
use crate::optim::{Optimizer, ParamGroupUpdater};
use crate::train::callback::{Phase, PhaseContext};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Capability set shared by all learning-rate policies
pub trait LrPolicy: Send {
    /// Policy name for logging
    fn name(&self) -> &'static str;

    /// Phase this policy is dispatched at
    fn phase(&self) -> Phase;

    /// Shared scheduler state
    fn state(&self) -> &LrState;

    /// Whether scheduling is active for the context's position in the run.
    /// Must not mutate state.
    fn is_enabled(&self, ctx: &PhaseContext<'_>) -> bool;

    /// Compute the rate for the context's position and store it as `lr`
    fn compute(&mut self, ctx: &PhaseContext<'_>) -> f64;

    /// Write the last computed rate into the optimizer
    fn apply(&self, optimizer: &mut dyn Optimizer, epoch: usize, batch_idx: Option<usize>) {
        self.state().update_lr(optimizer, epoch, batch_idx);
    }

    /// Last computed rate
    fn lr(&self) -> f64 {
        self.state().lr
    }
}

/// State owned by every policy: target rate, last rate, loader length,
/// training parameters, and how rates reach the optimizer
#[derive(Clone)]
pub struct LrState {
    initial_lr: f64,
    lr: f64,
    train_loader_len: usize,
    training_params: TrainingParams,
    updater: Option<Arc<dyn ParamGroupUpdater>>,
    logger: SharedLogger,
}

impl LrState {
    /// Create scheduler state
    ///
    /// # Errors
    /// Returns `InvalidParameter` when the loader is empty, `max_epochs` is
    /// zero, `batch_accumulate` is zero, or the initial rate is not finite.
    pub fn new(
        initial_lr: f64,
        train_loader_len: usize,
        training_params: TrainingParams,
    ) -> Result<Self> {
        if !initial_lr.is_finite() {
            return Err(Error::InvalidParameter {
                field: "initial_lr",
                message: format!("must be finite, got {initial_lr}"),
            });
        }
        if train_loader_len == 0 {
            return Err(Error::InvalidParameter {
                field: "train_loader_len",
                message: "must be > 0".to_string(),
            });
        }
        if training_params.max_epochs == 0 {
            return Err(Error::InvalidParameter {
                field: "max_epochs",
                message: "must be > 0".to_string(),
            });
        }
        if training_params.batch_accumulate == 0 {
            return Err(Error::InvalidParameter {
                field: "batch_accumulate",
                message: "must be >= 1".to_string(),
            });
        }
        Ok(Self {
            initial_lr,
            lr: initial_lr,
            train_loader_len,
            training_params,
            updater: None,
            logger: default_logger(),
        })
    }

    /// Route rate updates through a custom parameter-group updater
    pub fn with_updater(mut self, updater: Arc<dyn ParamGroupUpdater>) -> Self {
        self.updater = Some(updater);
        self
    }

    /// Use `logger` for construction-time warnings
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn initial_lr(&self) -> f64 {
        self.initial_lr
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    pub fn train_loader_len(&self) -> usize {
        self.train_loader_len
    }

    pub fn training_params(&self) -> &TrainingParams {
        &self.training_params
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    /// Whether a custom parameter-group updater is configured
    pub fn has_updater(&self) -> bool {
        self.updater.is_some()
    }

    pub(crate) fn set_lr(&mut self, lr: f64) -> f64 {
        self.lr = lr;
        lr
    }

    /// Flattened batch count since the start of training
    pub(crate) fn global_step(&self, epoch: usize, batch_idx: usize) -> usize {
        epoch * self.train_loader_len + batch_idx
    }

    /// Batches into the decay curve: `L * (epoch - warmup_epochs) + batch_idx`.
    /// Negative before the warmup epochs have elapsed.
    pub(crate) fn iters_since_warmup(&self, epoch: usize, batch_idx: usize) -> f64 {
        let effective_epoch = epoch as f64 - self.training_params.lr_warmup_epochs as f64;
        self.train_loader_len as f64 * effective_epoch + batch_idx as f64
    }

    /// Write `lr` into the optimizer, through the updater when configured
    pub fn update_lr(&self, optimizer: &mut dyn Optimizer, epoch: usize, batch_idx: Option<usize>) {
        match &self.updater {
            Some(updater) => {
                let groups = optimizer.param_groups().to_vec();
                let updated = updater.update_param_groups(
                    groups,
                    self.lr,
                    epoch,
                    batch_idx,
                    &self.training_params,
                    self.train_loader_len,
                );
                optimizer.replace_param_groups(updated);
            }
            None => optimizer.set_lr(self.lr),
        }
    }
}

impl fmt::Debug for LrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrState")
            .field("initial_lr", &self.initial_lr)
            .field("lr", &self.lr)
            .field("train_loader_len", &self.train_loader_len)
            .field("training_params", &self.training_params)
            .field("has_updater", &self.updater.is_some())
            .finish_non_exhaustive()
    }
}

/// Decay schedule selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LrMode {
    Step,
    Poly,
    Cosine,
    Exp,
    Function,
}

impl LrMode {
    /// Every mode, in the order shown to users
    pub const ALL: [LrMode; 5] =
        [LrMode::Step, LrMode::Poly, LrMode::Cosine, LrMode::Exp, LrMode::Function];

    pub fn as_str(self) -> &'static str {
        match self {
            LrMode::Step => "step",
            LrMode::Poly => "poly",
            LrMode::Cosine => "cosine",
            LrMode::Exp => "exp",
            LrMode::Function => "function",
        }
    }

    /// Names accepted by [`FromStr`]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }
}

impl fmt::Display for LrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LrMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| Error::UnknownLrMode { mode: s.to_string(), valid: Self::names() })
    }
}
