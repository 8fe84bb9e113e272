//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use crate::optim::LrMode;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = RunSpec> {
    (
        1e-6f64..1.0,               // initial_lr
        1usize..2000,               // train_loader_len
        1usize..300,                // max_epochs
        0usize..10,                 // lr_warmup_steps
        prop::sample::select(LrMode::ALL.to_vec()),
    )
        .prop_map(|(initial_lr, train_loader_len, max_epochs, lr_warmup_steps, mode)| RunSpec {
            initial_lr,
            train_loader_len,
            update_param_groups: false,
            training: TrainingParams {
                max_epochs,
                lr_warmup_steps: lr_warmup_steps.min(train_loader_len),
                ..Default::default()
            },
            schedule: ScheduleSpec {
                lr_mode: mode.to_string(),
                lr_schedule_function: Some("linear_decay".to_string()),
                ..Default::default()
            },
            stage_switch: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_zero_loader_len_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.train_loader_len = 0;
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidTrainLoaderLen(0))
        ));
    }

    #[test]
    fn prop_non_positive_lr_fails(spec in arb_valid_spec(), lr in -10.0f64..=0.0) {
        let mut spec = spec;
        spec.initial_lr = lr;
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidLearningRate(_))
        ));
    }

    #[test]
    fn prop_stage_switch_within_run_passes(spec in arb_valid_spec(), frac in 0.0f64..1.0) {
        let mut spec = spec;
        let epoch = (frac * spec.training.max_epochs as f64) as usize;
        spec.stage_switch = Some(StageSwitchSpec { next_stage_start_epoch: epoch });
        prop_assert!(validate_config(&spec).is_ok());
    }
}
