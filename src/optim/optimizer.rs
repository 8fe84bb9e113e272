//! Optimizer boundary: parameter groups and the custom group-update hook

use crate::config::TrainingParams;

/// One parameter group of an external optimizer
///
/// Only `lr` is written by schedulers. `lr_multiplier` lets architectures
/// scale the scheduled rate per group through [`LrMultiplierUpdater`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParamGroup {
    /// Optional group label (e.g. "backbone", "head")
    pub name: Option<String>,
    /// Current learning rate
    pub lr: f64,
    /// Per-group multiplier applied by multiplier-aware updaters
    pub lr_multiplier: f64,
    /// Weight decay, carried through untouched
    pub weight_decay: f64,
}

impl ParamGroup {
    /// Create an unnamed group with multiplier 1.0 and no weight decay
    pub fn new(lr: f64) -> Self {
        Self { name: None, lr, lr_multiplier: 1.0, weight_decay: 0.0 }
    }

    /// Create a named group
    pub fn named(name: impl Into<String>, lr: f64) -> Self {
        Self { name: Some(name.into()), ..Self::new(lr) }
    }

    /// Set the per-group learning-rate multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.lr_multiplier = multiplier;
        self
    }

    /// Set the weight decay
    pub fn with_weight_decay(mut self, weight_decay: f64) -> Self {
        self.weight_decay = weight_decay;
        self
    }
}

/// Ordered parameter groups of an optimizer owned by the training loop
pub trait Optimizer: Send {
    /// Groups in their canonical order
    fn param_groups(&self) -> &[ParamGroup];

    /// Mutable access to the groups
    fn param_groups_mut(&mut self) -> &mut Vec<ParamGroup>;

    /// Replace the whole group sequence
    fn replace_param_groups(&mut self, groups: Vec<ParamGroup>) {
        *self.param_groups_mut() = groups;
    }

    /// Learning rate of the first group, if any
    fn lr(&self) -> Option<f64> {
        self.param_groups().first().map(|g| g.lr)
    }

    /// Set the learning rate on every group
    fn set_lr(&mut self, lr: f64) {
        for group in self.param_groups_mut() {
            group.lr = lr;
        }
    }
}

/// Minimal optimizer that only holds parameter groups
///
/// Used by schedule simulation and by tests; real loops implement
/// [`Optimizer`] on their own optimizer type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamGroupOptimizer {
    groups: Vec<ParamGroup>,
}

impl ParamGroupOptimizer {
    pub fn new(groups: Vec<ParamGroup>) -> Self {
        Self { groups }
    }

    /// Single group at the given learning rate
    pub fn single(lr: f64) -> Self {
        Self::new(vec![ParamGroup::new(lr)])
    }
}

impl Optimizer for ParamGroupOptimizer {
    fn param_groups(&self) -> &[ParamGroup] {
        &self.groups
    }

    fn param_groups_mut(&mut self) -> &mut Vec<ParamGroup> {
        &mut self.groups
    }
}

/// Custom parameter-group update supplied by the network
///
/// When configured on a scheduler, the scheduler hands over the full group
/// sequence and replaces the optimizer's groups with the returned ones
/// instead of writing one global rate.
pub trait ParamGroupUpdater: Send + Sync {
    fn update_param_groups(
        &self,
        groups: Vec<ParamGroup>,
        lr: f64,
        epoch: usize,
        batch_idx: Option<usize>,
        training_params: &TrainingParams,
        train_loader_len: usize,
    ) -> Vec<ParamGroup>;
}

/// Updater that scales the scheduled rate by each group's `lr_multiplier`
#[derive(Clone, Copy, Debug, Default)]
pub struct LrMultiplierUpdater;

impl ParamGroupUpdater for LrMultiplierUpdater {
    fn update_param_groups(
        &self,
        mut groups: Vec<ParamGroup>,
        lr: f64,
        _epoch: usize,
        _batch_idx: Option<usize>,
        _training_params: &TrainingParams,
        _train_loader_len: usize,
    ) -> Vec<ParamGroup> {
        for group in &mut groups {
            group.lr = lr * group.lr_multiplier;
        }
        groups
    }
}
