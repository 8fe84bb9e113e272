//! Per-dispatch state passed to callbacks

use crate::config::TrainingParams;
use crate::error::{Error, Result};
use crate::optim::Optimizer;
use std::collections::BTreeMap;

/// Loss criterion capabilities a callback may toggle
pub trait Criterion: Send {
    /// Whether the L1 term is active
    fn use_l1(&self) -> bool;

    /// Enable or disable the L1 term
    fn set_use_l1(&mut self, enabled: bool);
}

/// A data augmentation applied by the train loader
pub trait Transform: Send {
    fn name(&self) -> &str;

    /// Whether the transform can be permanently disabled with [`Transform::close`]
    fn is_closable(&self) -> bool {
        false
    }

    /// Disable the transform for the rest of the run
    fn close(&mut self) {}
}

/// Train loader capabilities visible to callbacks
pub trait DataLoader: Send {
    /// Batches per epoch
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The loader's augmentation pipeline
    fn transforms_mut(&mut self) -> &mut [Box<dyn Transform>];

    /// Rebuild iteration state so transform changes take effect
    fn restart(&mut self) {}
}

/// State of the training loop at one dispatch
///
/// The loop builds a fresh context for every dispatch. Callbacks read it
/// freely but only write what their contract allows: optimizer learning
/// rates and one-shot stage flags on the criterion and loader.
///
/// # Example
///
/// ```rust
/// use cadencia::optim::ParamGroupOptimizer;
/// use cadencia::train::callback::PhaseContext;
///
/// let mut optimizer = ParamGroupOptimizer::single(0.1);
/// let ctx = PhaseContext::new(3, 17).with_optimizer(&mut optimizer).with_metric("mAP", 0.41);
/// assert_eq!(ctx.epoch, 3);
/// assert_eq!(ctx.metrics.get("mAP"), Some(&0.41));
/// ```
#[derive(Default)]
pub struct PhaseContext<'a> {
    /// Current epoch (0-indexed)
    pub epoch: usize,
    /// Batch index within the current epoch
    pub batch_idx: usize,
    /// Optimizer whose parameter groups receive scheduled rates
    pub optimizer: Option<&'a mut dyn Optimizer>,
    /// Training parameters of the run
    pub training_params: Option<&'a TrainingParams>,
    /// Metrics reported so far, by name
    pub metrics: BTreeMap<String, f64>,
    /// Most recent loss value
    pub loss: Option<f64>,
    /// Loss criterion
    pub criterion: Option<&'a mut dyn Criterion>,
    /// Training data loader
    pub train_loader: Option<&'a mut dyn DataLoader>,
}

impl<'a> PhaseContext<'a> {
    /// Context positioned at `(epoch, batch_idx)` with no collaborators
    pub fn new(epoch: usize, batch_idx: usize) -> Self {
        Self { epoch, batch_idx, ..Default::default() }
    }

    pub fn with_optimizer(mut self, optimizer: &'a mut dyn Optimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn with_training_params(mut self, training_params: &'a TrainingParams) -> Self {
        self.training_params = Some(training_params);
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn with_metrics(mut self, metrics: BTreeMap<String, f64>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_loss(mut self, loss: f64) -> Self {
        self.loss = Some(loss);
        self
    }

    pub fn with_criterion(mut self, criterion: &'a mut dyn Criterion) -> Self {
        self.criterion = Some(criterion);
        self
    }

    pub fn with_train_loader(mut self, train_loader: &'a mut dyn DataLoader) -> Self {
        self.train_loader = Some(train_loader);
        self
    }

    /// Flattened batch count since the start of training
    pub fn global_step(&self, train_loader_len: usize) -> usize {
        self.epoch * train_loader_len + self.batch_idx
    }

    /// Warmup epochs of the run, 0 when no parameters are attached
    pub fn lr_warmup_epochs(&self) -> usize {
        self.training_params.map_or(0, |p| p.lr_warmup_epochs)
    }

    /// The optimizer, or `MissingContextField` naming `callback`
    pub fn optimizer_mut(
        &mut self,
        callback: &'static str,
    ) -> Result<&mut (dyn Optimizer + 'a)> {
        self.optimizer
            .as_deref_mut()
            .ok_or(Error::MissingContextField { callback, field: "optimizer" })
    }

    /// The criterion, or `MissingContextField` naming `callback`
    pub fn criterion_mut(&mut self, callback: &'static str) -> Result<&mut (dyn Criterion + 'a)> {
        self.criterion
            .as_deref_mut()
            .ok_or(Error::MissingContextField { callback, field: "criterion" })
    }

    /// The train loader, or `MissingContextField` naming `callback`
    pub fn train_loader_mut(
        &mut self,
        callback: &'static str,
    ) -> Result<&mut (dyn DataLoader + 'a)> {
        self.train_loader
            .as_deref_mut()
            .ok_or(Error::MissingContextField { callback, field: "train_loader" })
    }
}
