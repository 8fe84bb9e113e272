//! Validation error types
//!
//! Defines all validation error variants for run specifications.

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid initial learning rate: {0} (must be finite and > 0.0)")]
    InvalidLearningRate(f64),

    #[error("Invalid train loader length: {0} (must be > 0)")]
    InvalidTrainLoaderLen(usize),

    #[error("Invalid max_epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid batch_accumulate: {0} (must be >= 1)")]
    InvalidBatchAccumulate(usize),

    #[error("Invalid warmup_initial_lr: {0} (must be finite and >= 0.0)")]
    InvalidWarmupInitialLr(f64),

    #[error(
        "Warmup and cooldown epochs ({warmup} + {cooldown}) exceed max_epochs ({max_epochs})"
    )]
    InvalidEpochWindow { warmup: usize, cooldown: usize, max_epochs: usize },

    #[error("Invalid lr_mode: {0} (must be one of: step, poly, cosine, exp, function)")]
    InvalidLrMode(String),

    #[error("Invalid lr_decay_factor: {0} (must be finite and > 0.0)")]
    InvalidDecayFactor(f64),

    #[error("Invalid cosine_final_lr_ratio: {0} (must be in [0.0, 1.0])")]
    InvalidCosineFinalRatio(f64),

    #[error("lr_warmup_steps ({lr_warmup_steps}) exceeds the {decay_steps} cosine decay steps")]
    CosineWarmupExceedsDecay { lr_warmup_steps: usize, decay_steps: i64 },

    #[error("Step decay takes either lr_updates or step_lr_update_freq, not both")]
    ConflictingStepArguments,

    #[error("lr_mode 'function' requires lr_schedule_function")]
    MissingScheduleFunction,

    #[error("Stage switch epoch {epoch} is never reached (max_epochs = {max_epochs})")]
    UnreachableStageSwitch { epoch: usize, max_epochs: usize },
}

impl From<ValidationError> for crate::error::Error {
    fn from(err: ValidationError) -> Self {
        crate::error::Error::ConfigError(format!("Invalid config: {err}"))
    }
}
