//! YAML schema definitions for declarative schedule configuration

use serde::{Deserialize, Serialize};

/// Training parameters the schedulers depend on
///
/// Immutable for the duration of a run. Every scheduler keeps its own copy,
/// taken at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Total number of epochs in the run
    pub max_epochs: usize,

    /// Epochs of epoch-granularity warmup (0 disables it)
    pub lr_warmup_epochs: usize,

    /// Starting rate for warmup; derived from the initial rate when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_initial_lr: Option<f64>,

    /// Final epochs excluded from decay progression
    pub lr_cooldown_epochs: usize,

    /// Batches of step-granularity warmup (0 disables it)
    pub lr_warmup_steps: usize,

    /// Batches accumulated per optimizer step
    pub batch_accumulate: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            max_epochs: 10,
            lr_warmup_epochs: 0,
            warmup_initial_lr: None,
            lr_cooldown_epochs: 0,
            lr_warmup_steps: 0,
            batch_accumulate: 1,
        }
    }
}

impl TrainingParams {
    /// First epoch excluded from decay schedules (`max_epochs - cooldown`)
    pub fn post_warmup_epochs(&self) -> usize {
        self.max_epochs.saturating_sub(self.lr_cooldown_epochs)
    }

    /// Whether `epoch` lies in the decay window `[warmup, max - cooldown)`
    pub fn in_decay_window(&self, epoch: usize) -> bool {
        self.lr_warmup_epochs <= epoch && epoch < self.post_warmup_epochs()
    }

    /// Epochs the decay curve spans (`max - warmup - cooldown`), may be negative
    pub fn decay_epochs(&self) -> i64 {
        self.max_epochs as i64 - self.lr_warmup_epochs as i64 - self.lr_cooldown_epochs as i64
    }
}

/// Learning-rate decay schedule selection and its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSpec {
    /// Decay mode: "step" | "poly" | "cosine" | "exp" | "function"
    pub lr_mode: String,

    /// Explicit step-decay milestones (epochs)
    pub lr_updates: Vec<usize>,

    /// Multiplicative decay factor for step and exponential decay
    pub lr_decay_factor: f64,

    /// Derive step-decay milestones every `k` epochs instead of listing them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_lr_update_freq: Option<f64>,

    /// Final rate of cosine decay, as a fraction of the initial rate
    pub cosine_final_lr_ratio: f64,

    /// Registered name of the user schedule function for "function" mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lr_schedule_function: Option<String>,
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        Self {
            lr_mode: "cosine".to_string(),
            lr_updates: Vec::new(),
            lr_decay_factor: 0.1,
            step_lr_update_freq: None,
            cosine_final_lr_ratio: 0.01,
            lr_schedule_function: None,
        }
    }
}

/// One-shot stage switch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSwitchSpec {
    /// Epoch at whose start the next training stage begins
    pub next_stage_start_epoch: usize,
}

/// Complete run specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    /// Steady-state learning rate
    pub initial_lr: f64,

    /// Batches per epoch
    pub train_loader_len: usize,

    /// Route rate updates through the network's parameter-group updater
    #[serde(default)]
    pub update_param_groups: bool,

    /// Training hyperparameters
    #[serde(default)]
    pub training: TrainingParams,

    /// Decay schedule
    #[serde(default)]
    pub schedule: ScheduleSpec,

    /// Optional stage switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_switch: Option<StageSwitchSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let yaml = r"
initial_lr: 0.1
train_loader_len: 100
";
        let spec: RunSpec = serde_yaml::from_str(yaml).expect("minimal config should parse");
        assert_eq!(spec.initial_lr, 0.1);
        assert_eq!(spec.train_loader_len, 100);
        assert!(!spec.update_param_groups);
        assert_eq!(spec.training, TrainingParams::default());
        assert_eq!(spec.schedule.lr_mode, "cosine");
        assert!(spec.stage_switch.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let yaml = r"
initial_lr: 0.02
train_loader_len: 500
update_param_groups: true
training:
  max_epochs: 300
  lr_warmup_epochs: 5
  warmup_initial_lr: 0.001
  lr_cooldown_epochs: 15
  batch_accumulate: 2
schedule:
  lr_mode: step
  lr_updates: [100, 200]
  lr_decay_factor: 0.5
stage_switch:
  next_stage_start_epoch: 285
";
        let spec: RunSpec = serde_yaml::from_str(yaml).expect("full config should parse");
        assert_eq!(spec.training.max_epochs, 300);
        assert_eq!(spec.training.warmup_initial_lr, Some(0.001));
        assert_eq!(spec.training.lr_warmup_steps, 0);
        assert_eq!(spec.training.batch_accumulate, 2);
        assert_eq!(spec.schedule.lr_updates, vec![100, 200]);
        assert_eq!(spec.schedule.lr_decay_factor, 0.5);
        assert_eq!(spec.stage_switch.map(|s| s.next_stage_start_epoch), Some(285));
    }

    #[test]
    fn test_missing_initial_lr_fails() {
        let result: Result<RunSpec, _> = serde_yaml::from_str("train_loader_len: 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_decay_window() {
        let params = TrainingParams {
            max_epochs: 10,
            lr_warmup_epochs: 2,
            lr_cooldown_epochs: 3,
            ..Default::default()
        };
        assert_eq!(params.post_warmup_epochs(), 7);
        assert_eq!(params.decay_epochs(), 5);
        assert!(!params.in_decay_window(1));
        assert!(params.in_decay_window(2));
        assert!(params.in_decay_window(6));
        assert!(!params.in_decay_window(7));
    }

    #[test]
    fn test_serialize_skips_unset_options() {
        let yaml = serde_yaml::to_string(&TrainingParams::default()).expect("serializes");
        assert!(!yaml.contains("warmup_initial_lr"));
        assert!(yaml.contains("batch_accumulate: 1"));
    }
}
