//! Build training callbacks from configuration

use super::schema::RunSpec;
use crate::error::Result;
use crate::logging::SharedLogger;
use crate::optim::{
    BatchStepLinearWarmupLr, CosineLr, EpochStepWarmupLr, ExponentialLr, FunctionLr, LrMode,
    LrMultiplierUpdater, LrState, ParamGroupUpdater, PolyLr, ScheduleFnRegistry, StepLr,
};
use crate::train::callback::{CallbackManager, DetectionStageSwitch, StageSwitchCallback};
use std::sync::Arc;

/// Build the scheduler state shared by every policy of a run
///
/// With `update_param_groups` set, rates go through `updater`, or through
/// [`LrMultiplierUpdater`] when none is given.
pub fn build_lr_state(
    spec: &RunSpec,
    updater: Option<Arc<dyn ParamGroupUpdater>>,
    logger: SharedLogger,
) -> Result<LrState> {
    let state = LrState::new(spec.initial_lr, spec.train_loader_len, spec.training.clone())?
        .with_logger(logger.clone());

    if !spec.update_param_groups {
        if updater.is_some() {
            logger.warn("A parameter-group updater was supplied but update_param_groups is false; it will be ignored.");
        }
        return Ok(state);
    }

    let updater = updater.unwrap_or_else(|| Arc::new(LrMultiplierUpdater));
    Ok(state.with_updater(updater))
}

/// Build the callbacks for a run
///
/// Registers, in order:
/// 1. the decay policy selected by `lr_mode`
/// 2. the warmup policy: batch-step when `lr_warmup_steps > 0`, otherwise
///    epoch-step when `lr_warmup_epochs > 0`
/// 3. the detection stage switch, if configured
///
/// # Errors
/// Returns `UnknownLrMode` for an unrecognized mode, `MissingScheduleFunction`
/// when the `function` mode's name is not in `registry`, and any construction
/// error of the selected policy.
pub fn build_callbacks(
    spec: &RunSpec,
    registry: &ScheduleFnRegistry,
    updater: Option<Arc<dyn ParamGroupUpdater>>,
    logger: SharedLogger,
) -> Result<CallbackManager> {
    let mode: LrMode = spec.schedule.lr_mode.parse()?;
    let state = build_lr_state(spec, updater, logger.clone())?;
    let schedule = &spec.schedule;
    let training = &spec.training;

    let mut manager = CallbackManager::with_logger(logger.clone());

    match mode {
        LrMode::Step => manager.register_scheduler(StepLr::new(
            state.clone(),
            schedule.lr_updates.clone(),
            schedule.lr_decay_factor,
            schedule.step_lr_update_freq,
        )?),
        LrMode::Poly => manager.register_scheduler(PolyLr::new(state.clone())?),
        LrMode::Cosine => manager
            .register_scheduler(CosineLr::new(state.clone(), schedule.cosine_final_lr_ratio)?),
        LrMode::Exp => {
            manager.register_scheduler(ExponentialLr::new(state.clone(), schedule.lr_decay_factor));
        }
        LrMode::Function => {
            manager.register_scheduler(FunctionLr::from_registry(
                state.clone(),
                registry,
                schedule.lr_schedule_function.as_deref(),
            )?);
        }
    }

    if training.lr_warmup_steps > 0 {
        if training.lr_warmup_epochs > 0 {
            logger.warn(&format!(
                "Both lr_warmup_steps ({}) and lr_warmup_epochs ({}) are set; using step warmup only.",
                training.lr_warmup_steps, training.lr_warmup_epochs
            ));
        }
        let warmup_initial_lr = training
            .warmup_initial_lr
            .unwrap_or(spec.initial_lr / (training.lr_warmup_steps + 1) as f64);
        manager.register_scheduler(BatchStepLinearWarmupLr::new(
            state,
            warmup_initial_lr,
            training.lr_warmup_steps,
        ));
    } else if training.lr_warmup_epochs > 0 {
        manager.register_scheduler(EpochStepWarmupLr::new(state));
    }

    if let Some(switch) = &spec.stage_switch {
        manager.register(
            StageSwitchCallback::<DetectionStageSwitch>::PHASE,
            DetectionStageSwitch::at_epoch(switch.next_stage_start_epoch),
        );
    }

    logger.info(&format!(
        "Built {} callbacks for lr_mode={mode} ({} epochs x {} batches)",
        manager.len(),
        training.max_epochs,
        spec.train_loader_len
    ));
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ScheduleSpec, StageSwitchSpec, TrainingParams};
    use crate::error::Error;
    use crate::logging::{LogLevel, RecordingLogger};
    use crate::train::callback::Phase;

    fn spec(mode: &str) -> RunSpec {
        RunSpec {
            initial_lr: 0.1,
            train_loader_len: 10,
            update_param_groups: false,
            training: TrainingParams { max_epochs: 20, ..Default::default() },
            schedule: ScheduleSpec { lr_mode: mode.to_string(), ..Default::default() },
            stage_switch: None,
        }
    }

    fn build(spec: &RunSpec) -> Result<CallbackManager> {
        let (_, logger) = RecordingLogger::shared();
        build_callbacks(spec, &ScheduleFnRegistry::new(), None, logger)
    }

    #[test]
    fn test_each_mode_registers_at_its_phase() {
        let cases = [
            ("step", Phase::TrainEpochEnd, "StepLr"),
            ("poly", Phase::TrainBatchStep, "PolyLr"),
            ("cosine", Phase::TrainBatchStep, "CosineLr"),
            ("exp", Phase::TrainBatchStep, "ExponentialLr"),
        ];
        for (mode, phase, name) in cases {
            let manager = build(&spec(mode)).expect("valid spec");
            assert_eq!(manager.callback_names(phase), vec![name], "mode {mode}");
            assert_eq!(manager.len(), 1);
        }
    }

    #[test]
    fn test_unknown_mode() {
        let err = build(&spec("linear")).unwrap_err();
        assert!(matches!(err, Error::UnknownLrMode { ref mode, .. } if mode == "linear"));
    }

    #[test]
    fn test_function_mode_looks_up_registry() {
        let mut spec = spec("function");
        spec.schedule.lr_schedule_function = Some("constant".to_string());

        let err = build(&spec).unwrap_err();
        assert!(matches!(err, Error::MissingScheduleFunction { ref name, .. } if name == "constant"));

        let mut registry = ScheduleFnRegistry::new();
        registry.register("constant", |args| args.initial_lr);
        let (_, logger) = RecordingLogger::shared();
        let manager = build_callbacks(&spec, &registry, None, logger).expect("registered");
        assert_eq!(manager.callback_names(Phase::TrainBatchStep), vec!["FunctionLr"]);
    }

    #[test]
    fn test_function_mode_without_name() {
        let err = build(&spec("function")).unwrap_err();
        assert!(matches!(err, Error::MissingScheduleFunction { .. }));
    }

    #[test]
    fn test_epoch_warmup_registered_after_decay() {
        let mut spec = spec("step");
        spec.training.lr_warmup_epochs = 3;
        let manager = build(&spec).expect("valid spec");
        assert_eq!(manager.callback_names(Phase::TrainEpochStart), vec!["EpochStepWarmupLr"]);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_step_warmup_takes_precedence() {
        let mut spec = spec("cosine");
        spec.training.lr_warmup_epochs = 2;
        spec.training.lr_warmup_steps = 5;
        let (recorder, logger) = RecordingLogger::shared();

        let manager =
            build_callbacks(&spec, &ScheduleFnRegistry::new(), None, logger).expect("valid spec");
        assert_eq!(manager.callback_names(Phase::TrainBatchStart), vec!["BatchStepLinearWarmupLr"]);
        assert!(manager.callback_names(Phase::TrainEpochStart).is_empty());
        assert_eq!(recorder.count(LogLevel::Warn), 1);
    }

    #[test]
    fn test_stage_switch_registered_last() {
        let mut spec = spec("step");
        spec.training.lr_warmup_epochs = 1;
        spec.stage_switch = Some(StageSwitchSpec { next_stage_start_epoch: 15 });
        let manager = build(&spec).expect("valid spec");
        assert_eq!(
            manager.callback_names(Phase::TrainEpochStart),
            vec!["EpochStepWarmupLr", "DetectionStageSwitch"]
        );
    }

    #[test]
    fn test_updater_ignored_without_flag() {
        let spec = spec("cosine");
        let (recorder, logger) = RecordingLogger::shared();
        let state = build_lr_state(&spec, Some(Arc::new(LrMultiplierUpdater)), logger)
            .expect("valid spec");
        assert!(!state.has_updater());
        assert_eq!(recorder.count(LogLevel::Warn), 1);
    }

    #[test]
    fn test_flag_defaults_to_multiplier_updater() {
        let mut spec = spec("cosine");
        spec.update_param_groups = true;
        let (_, logger) = RecordingLogger::shared();
        let state = build_lr_state(&spec, None, logger).expect("valid spec");
        assert!(state.has_updater());
    }

    #[test]
    fn test_poly_without_decay_epochs_fails() {
        let mut spec = spec("poly");
        spec.training.lr_warmup_epochs = 20;
        let err = build(&spec).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }
}
