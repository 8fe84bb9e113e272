//! Diagnostic callbacks that observe the loop without changing it

use super::context::PhaseContext;
use super::phase::Phase;
use super::traits::PhaseCallback;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Appends the first parameter group's learning rate to a shared history
///
/// The history is owned by the caller; clone the handle from
/// [`LrRecorder::history`] before handing the recorder to a manager.
#[derive(Debug, Clone)]
pub struct LrRecorder {
    history: Arc<Mutex<Vec<f64>>>,
    phase: Phase,
}

impl LrRecorder {
    /// Recorder meant for [`Phase::ValidationEpochEnd`]
    pub fn new() -> Self {
        Self::at_phase(Phase::ValidationEpochEnd)
    }

    /// Recorder meant for `phase`
    pub fn at_phase(phase: Phase) -> Self {
        Self { history: Arc::new(Mutex::new(Vec::new())), phase }
    }

    /// Record into an existing history
    pub fn with_history(mut self, history: Arc<Mutex<Vec<f64>>>) -> Self {
        self.history = history;
        self
    }

    /// Phase to register this recorder at
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shared handle to the recorded rates
    pub fn history(&self) -> Arc<Mutex<Vec<f64>>> {
        Arc::clone(&self.history)
    }

    /// Copy of the rates recorded so far
    pub fn values(&self) -> Vec<f64> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Default for LrRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseCallback for LrRecorder {
    fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        let lr = ctx.optimizer_mut("LrRecorder")?.lr().ok_or(Error::InvalidParameter {
            field: "param_groups",
            message: "optimizer has no parameter groups".to_string(),
        })?;
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(lr);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LrRecorder"
    }
}

/// Owned copy of the parts of a [`PhaseContext`] worth inspecting later
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    pub epoch: usize,
    pub batch_idx: usize,
    /// Learning rate of every parameter group, empty without an optimizer
    pub lrs: Vec<f64>,
    pub metrics: BTreeMap<String, f64>,
    pub loss: Option<f64>,
}

impl ContextSnapshot {
    pub fn capture(ctx: &PhaseContext<'_>) -> Self {
        let lrs = ctx
            .optimizer
            .as_deref()
            .map(|opt| opt.param_groups().iter().map(|g| g.lr).collect())
            .unwrap_or_default();
        Self {
            epoch: ctx.epoch,
            batch_idx: ctx.batch_idx,
            lrs,
            metrics: ctx.metrics.clone(),
            loss: ctx.loss,
        }
    }
}

/// Keeps a snapshot of the most recent context it was dispatched with
#[derive(Debug, Clone, Default)]
pub struct ContextRecorder {
    last: Arc<Mutex<Option<ContextSnapshot>>>,
}

impl ContextRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the latest snapshot
    pub fn handle(&self) -> Arc<Mutex<Option<ContextSnapshot>>> {
        Arc::clone(&self.last)
    }

    /// Latest snapshot, if any dispatch happened
    pub fn last(&self) -> Option<ContextSnapshot> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PhaseCallback for ContextRecorder {
    fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        let snapshot = ContextSnapshot::capture(ctx);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ContextRecorder"
    }
}
