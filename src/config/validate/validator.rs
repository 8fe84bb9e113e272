//! Configuration validation logic
//!
//! Validates run specifications for correctness before schedulers are built.

use super::error::ValidationError;
use crate::config::schema::RunSpec;
use crate::optim::LrMode;

/// Validate a run specification
///
/// Checks:
/// - Numeric values are in valid ranges
/// - `lr_mode` names a known schedule
/// - Mode-specific arguments are consistent
pub fn validate_config(spec: &RunSpec) -> Result<(), ValidationError> {
    if !spec.initial_lr.is_finite() || spec.initial_lr <= 0.0 {
        return Err(ValidationError::InvalidLearningRate(spec.initial_lr));
    }

    if spec.train_loader_len == 0 {
        return Err(ValidationError::InvalidTrainLoaderLen(spec.train_loader_len));
    }

    let training = &spec.training;
    if training.max_epochs == 0 {
        return Err(ValidationError::InvalidEpochs(training.max_epochs));
    }

    if training.batch_accumulate == 0 {
        return Err(ValidationError::InvalidBatchAccumulate(training.batch_accumulate));
    }

    if let Some(warmup_initial_lr) = training.warmup_initial_lr {
        if !warmup_initial_lr.is_finite() || warmup_initial_lr < 0.0 {
            return Err(ValidationError::InvalidWarmupInitialLr(warmup_initial_lr));
        }
    }

    if training.lr_warmup_epochs + training.lr_cooldown_epochs > training.max_epochs {
        return Err(ValidationError::InvalidEpochWindow {
            warmup: training.lr_warmup_epochs,
            cooldown: training.lr_cooldown_epochs,
            max_epochs: training.max_epochs,
        });
    }

    let schedule = &spec.schedule;
    let mode: LrMode = schedule
        .lr_mode
        .parse()
        .map_err(|_| ValidationError::InvalidLrMode(schedule.lr_mode.clone()))?;

    match mode {
        LrMode::Step | LrMode::Exp => {
            if !schedule.lr_decay_factor.is_finite() || schedule.lr_decay_factor <= 0.0 {
                return Err(ValidationError::InvalidDecayFactor(schedule.lr_decay_factor));
            }
            let has_freq = schedule.step_lr_update_freq.is_some_and(|f| f > 0.0);
            if mode == LrMode::Step && has_freq && !schedule.lr_updates.is_empty() {
                return Err(ValidationError::ConflictingStepArguments);
            }
        }
        LrMode::Cosine => {
            let ratio = schedule.cosine_final_lr_ratio;
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ValidationError::InvalidCosineFinalRatio(ratio));
            }
            let decay_steps = spec.train_loader_len as i64 * training.decay_epochs();
            if training.lr_warmup_steps as i64 > decay_steps {
                return Err(ValidationError::CosineWarmupExceedsDecay {
                    lr_warmup_steps: training.lr_warmup_steps,
                    decay_steps,
                });
            }
        }
        LrMode::Function => {
            if schedule.lr_schedule_function.is_none() {
                return Err(ValidationError::MissingScheduleFunction);
            }
        }
        LrMode::Poly => {}
    }

    if let Some(switch) = &spec.stage_switch {
        if switch.next_stage_start_epoch >= training.max_epochs {
            return Err(ValidationError::UnreachableStageSwitch {
                epoch: switch.next_stage_start_epoch,
                max_epochs: training.max_epochs,
            });
        }
    }

    Ok(())
}
