//! Named dispatch points of the training loop

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the training loop at which registered callbacks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Once, before the first epoch
    PreTraining,
    /// Before each training epoch
    TrainEpochStart,
    /// Before each training batch's forward pass
    TrainBatchStart,
    /// After each optimizer step
    TrainBatchStep,
    /// After each training batch completes
    TrainBatchEnd,
    /// After the last batch of a training epoch
    TrainEpochEnd,
    /// After each validation batch
    ValidationBatchEnd,
    /// After validation completes for an epoch
    ValidationEpochEnd,
    /// After a validation epoch that produced a new best metric
    ValidationEndBestEpoch,
    /// After each test batch
    TestBatchEnd,
    /// After testing completes
    TestEnd,
    /// Once, after the last epoch
    PostTraining,
}

impl Phase {
    /// Every phase, in loop order
    pub const ALL: [Phase; 12] = [
        Phase::PreTraining,
        Phase::TrainEpochStart,
        Phase::TrainBatchStart,
        Phase::TrainBatchStep,
        Phase::TrainBatchEnd,
        Phase::TrainEpochEnd,
        Phase::ValidationBatchEnd,
        Phase::ValidationEpochEnd,
        Phase::ValidationEndBestEpoch,
        Phase::TestBatchEnd,
        Phase::TestEnd,
        Phase::PostTraining,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::PreTraining => "pre_training",
            Phase::TrainEpochStart => "train_epoch_start",
            Phase::TrainBatchStart => "train_batch_start",
            Phase::TrainBatchStep => "train_batch_step",
            Phase::TrainBatchEnd => "train_batch_end",
            Phase::TrainEpochEnd => "train_epoch_end",
            Phase::ValidationBatchEnd => "validation_batch_end",
            Phase::ValidationEpochEnd => "validation_epoch_end",
            Phase::ValidationEndBestEpoch => "validation_end_best_epoch",
            Phase::TestBatchEnd => "test_batch_end",
            Phase::TestEnd => "test_end",
            Phase::PostTraining => "post_training",
        }
    }

    /// Whether the phase fires per training batch, so `batch_idx` is meaningful
    pub fn is_batch_level(self) -> bool {
        matches!(self, Phase::TrainBatchStart | Phase::TrainBatchStep | Phase::TrainBatchEnd)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names_are_unique() {
        let names: std::collections::HashSet<_> = Phase::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names.len(), Phase::ALL.len());
    }

    #[test]
    fn test_batch_level_phases() {
        assert!(Phase::TrainBatchStep.is_batch_level());
        assert!(Phase::TrainBatchStart.is_batch_level());
        assert!(!Phase::TrainEpochStart.is_batch_level());
        assert!(!Phase::ValidationBatchEnd.is_batch_level());
    }

    #[test]
    fn test_phase_serde_names_match_display() {
        let yaml = serde_yaml::to_string(&Phase::ValidationEpochEnd).expect("serializes");
        assert_eq!(yaml.trim(), Phase::ValidationEpochEnd.to_string());
        let parsed: Phase = serde_yaml::from_str("train_batch_step").expect("parses");
        assert_eq!(parsed, Phase::TrainBatchStep);
    }
}
