//! One-shot training stage switches

use super::context::PhaseContext;
use super::phase::Phase;
use super::traits::PhaseCallback;
use crate::error::Result;

/// Epoch at which detection training drops heavy augmentation by default
pub const DEFAULT_DETECTION_SWITCH_EPOCH: usize = 285;

/// The change a [`StageSwitchCallback`] makes when its epoch arrives
pub trait StageChange: Send {
    /// Mutate the loop's collaborators for the next training stage
    ///
    /// On error nothing may have been changed, so the switch stays armed.
    fn apply_stage_change(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()>;

    fn name(&self) -> &'static str {
        "StageChange"
    }
}

/// Whether the switch has happened yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Waiting for the target epoch
    Armed,
    /// Applied at the recorded epoch
    Fired { epoch: usize },
}

/// Applies a [`StageChange`] exactly once, when the epoch reaches
/// `next_stage_start_epoch`
///
/// Bind it to [`Phase::TrainEpochStart`]. If the change fails the switch
/// stays armed and the error propagates.
pub struct StageSwitchCallback<S: StageChange> {
    next_stage_start_epoch: usize,
    change: S,
    state: SwitchState,
}

impl<S: StageChange> StageSwitchCallback<S> {
    /// Phase the switch is meant to be registered at
    pub const PHASE: Phase = Phase::TrainEpochStart;

    pub fn new(next_stage_start_epoch: usize, change: S) -> Self {
        Self { next_stage_start_epoch, change, state: SwitchState::Armed }
    }

    pub fn next_stage_start_epoch(&self) -> usize {
        self.next_stage_start_epoch
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn has_fired(&self) -> bool {
        matches!(self.state, SwitchState::Fired { .. })
    }

    pub fn change(&self) -> &S {
        &self.change
    }
}

impl<S: StageChange> PhaseCallback for StageSwitchCallback<S> {
    fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        if self.state != SwitchState::Armed || ctx.epoch != self.next_stage_start_epoch {
            return Ok(());
        }
        self.change.apply_stage_change(ctx)?;
        self.state = SwitchState::Fired { epoch: ctx.epoch };
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.change.name()
    }
}

/// Detection-training stage change
///
/// Closes every closable augmentation on the train loader, restarts the
/// loader so the change takes effect, and turns on the criterion's L1 term.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionStageSwitch;

impl DetectionStageSwitch {
    /// Switch callback firing at `epoch`
    pub fn at_epoch(epoch: usize) -> StageSwitchCallback<Self> {
        StageSwitchCallback::new(epoch, Self)
    }
}

impl StageChange for DetectionStageSwitch {
    fn apply_stage_change(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        // Both collaborators must be present before anything is changed
        ctx.criterion_mut("DetectionStageSwitch")?;
        let loader = ctx.train_loader_mut("DetectionStageSwitch")?;
        for transform in loader.transforms_mut().iter_mut().filter(|t| t.is_closable()) {
            transform.close();
        }
        loader.restart();

        ctx.criterion_mut("DetectionStageSwitch")?.set_use_l1(true);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "DetectionStageSwitch"
    }
}

impl Default for StageSwitchCallback<DetectionStageSwitch> {
    fn default() -> Self {
        DetectionStageSwitch::at_epoch(DEFAULT_DETECTION_SWITCH_EPOCH)
    }
}
