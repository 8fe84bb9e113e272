//! Dry-run of a configured schedule
//!
//! Drives the full phase sequence of a training run against a
//! [`ParamGroupOptimizer`] without any model, so a schedule can be previewed
//! or tested end to end:
//!
//! ```text
//! pre_training
//! for epoch in 0..max_epochs:
//!     train_epoch_start
//!     for batch in 0..train_loader_len:
//!         train_batch_start, train_batch_step, train_batch_end
//!     train_epoch_end
//!     validation_epoch_end
//! post_training
//! ```

use crate::config::RunSpec;
use crate::error::Result;
use crate::optim::{Optimizer, ParamGroupOptimizer};
use crate::train::callback::{CallbackManager, Criterion, DataLoader, Phase, PhaseContext, Transform};
use serde::Serialize;

/// Learning rate in effect when an epoch's validation finished
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LrSample {
    pub epoch: usize,
    pub lr: f64,
}

/// Loader stand-in with a fixed length and no augmentations
struct SimulatedLoader {
    len: usize,
    transforms: Vec<Box<dyn Transform>>,
}

impl DataLoader for SimulatedLoader {
    fn len(&self) -> usize {
        self.len
    }

    fn transforms_mut(&mut self) -> &mut [Box<dyn Transform>] {
        &mut self.transforms
    }
}

#[derive(Default)]
struct SimulatedCriterion {
    use_l1: bool,
}

impl Criterion for SimulatedCriterion {
    fn use_l1(&self) -> bool {
        self.use_l1
    }

    fn set_use_l1(&mut self, enabled: bool) {
        self.use_l1 = enabled;
    }
}

/// Collaborators owned by the simulated loop
struct Simulation<'s> {
    spec: &'s RunSpec,
    optimizer: ParamGroupOptimizer,
    loader: SimulatedLoader,
    criterion: SimulatedCriterion,
}

impl Simulation<'_> {
    fn dispatch(
        &mut self,
        manager: &mut CallbackManager,
        phase: Phase,
        epoch: usize,
        batch_idx: usize,
    ) -> Result<()> {
        let mut ctx = PhaseContext::new(epoch, batch_idx)
            .with_optimizer(&mut self.optimizer)
            .with_training_params(&self.spec.training)
            .with_train_loader(&mut self.loader)
            .with_criterion(&mut self.criterion);
        manager.dispatch(phase, &mut ctx)
    }
}

/// Run every phase of `spec`'s training loop through `manager`
///
/// The optimizer starts as a single group at `initial_lr`. One sample is
/// taken per epoch, after `validation_epoch_end`.
///
/// # Errors
/// Returns the first callback error.
pub fn simulate_run(spec: &RunSpec, manager: &mut CallbackManager) -> Result<Vec<LrSample>> {
    let max_epochs = spec.training.max_epochs;
    let mut sim = Simulation {
        spec,
        optimizer: ParamGroupOptimizer::single(spec.initial_lr),
        loader: SimulatedLoader { len: spec.train_loader_len, transforms: Vec::new() },
        criterion: SimulatedCriterion::default(),
    };

    tracing::debug!(max_epochs, train_loader_len = spec.train_loader_len, "simulating run");
    sim.dispatch(manager, Phase::PreTraining, 0, 0)?;

    let mut samples = Vec::with_capacity(max_epochs);
    for epoch in 0..max_epochs {
        sim.dispatch(manager, Phase::TrainEpochStart, epoch, 0)?;
        for batch_idx in 0..spec.train_loader_len {
            sim.dispatch(manager, Phase::TrainBatchStart, epoch, batch_idx)?;
            sim.dispatch(manager, Phase::TrainBatchStep, epoch, batch_idx)?;
            sim.dispatch(manager, Phase::TrainBatchEnd, epoch, batch_idx)?;
        }
        let last_batch = spec.train_loader_len.saturating_sub(1);
        sim.dispatch(manager, Phase::TrainEpochEnd, epoch, last_batch)?;
        sim.dispatch(manager, Phase::ValidationEpochEnd, epoch, 0)?;

        let lr = sim.optimizer.lr().unwrap_or(spec.initial_lr);
        samples.push(LrSample { epoch, lr });
    }

    sim.dispatch(manager, Phase::PostTraining, max_epochs, 0)?;
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingParams;
    use crate::train::callback::{ContextRecorder, LrRecorder, PhaseCallback};
    use std::sync::{Arc, Mutex};

    fn spec(max_epochs: usize, train_loader_len: usize) -> RunSpec {
        RunSpec {
            initial_lr: 0.1,
            train_loader_len,
            update_param_groups: false,
            training: TrainingParams { max_epochs, ..Default::default() },
            schedule: Default::default(),
            stage_switch: None,
        }
    }

    /// Records the (epoch, batch) of every dispatch it sees
    struct PhaseLog(Arc<Mutex<Vec<(usize, usize)>>>);

    impl PhaseCallback for PhaseLog {
        fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
            self.0.lock().expect("lock").push((ctx.epoch, ctx.batch_idx));
            Ok(())
        }
    }

    #[test]
    fn test_empty_manager_keeps_initial_lr() {
        let spec = spec(3, 4);
        let samples = simulate_run(&spec, &mut CallbackManager::new()).expect("simulation");
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.lr == 0.1));
        assert_eq!(samples.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_dispatch_counts_per_phase() {
        let spec = spec(2, 5);
        let mut manager = CallbackManager::new();
        let logs: Vec<_> = Phase::ALL
            .iter()
            .map(|&phase| {
                let log = Arc::new(Mutex::new(Vec::new()));
                manager.register(phase, PhaseLog(Arc::clone(&log)));
                (phase, log)
            })
            .collect();

        simulate_run(&spec, &mut manager).expect("simulation");

        let count = |phase: Phase| {
            logs.iter().find(|(p, _)| *p == phase).map_or(0, |(_, log)| log.lock().expect("lock").len())
        };
        assert_eq!(count(Phase::PreTraining), 1);
        assert_eq!(count(Phase::TrainEpochStart), 2);
        assert_eq!(count(Phase::TrainBatchStart), 10);
        assert_eq!(count(Phase::TrainBatchStep), 10);
        assert_eq!(count(Phase::TrainBatchEnd), 10);
        assert_eq!(count(Phase::TrainEpochEnd), 2);
        assert_eq!(count(Phase::ValidationEpochEnd), 2);
        assert_eq!(count(Phase::PostTraining), 1);
        assert_eq!(count(Phase::TestEnd), 0);
    }

    #[test]
    fn test_recorder_sees_every_validation_epoch() {
        let spec = spec(4, 2);
        let recorder = LrRecorder::new();
        let history = recorder.history();
        let mut manager = CallbackManager::new();
        manager.register(recorder.phase(), recorder);

        simulate_run(&spec, &mut manager).expect("simulation");
        assert_eq!(*history.lock().expect("lock"), vec![0.1; 4]);
    }

    #[test]
    fn test_last_batch_step_context() {
        let spec = spec(2, 3);
        let recorder = ContextRecorder::new();
        let handle = recorder.handle();
        let mut manager = CallbackManager::new();
        manager.register(Phase::TrainBatchStep, recorder);

        simulate_run(&spec, &mut manager).expect("simulation");
        let last = handle.lock().expect("lock").clone().expect("recorded");
        assert_eq!((last.epoch, last.batch_idx), (1, 2));
        assert_eq!(last.lrs, vec![0.1]);
    }
}
