//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::Verbosity;
use crate::config::{load_config, validate_config, RunSpec, ValidateArgs};

/// Format run-level settings as a string
pub fn format_run_info(spec: &RunSpec) -> String {
    let mut lines = vec![
        format!("  Initial learning rate: {}", spec.initial_lr),
        format!("  Batches per epoch: {}", spec.train_loader_len),
    ];
    if spec.update_param_groups {
        lines.push("  Parameter groups: updated per group".to_string());
    }
    lines.join("\n")
}

/// Format training parameters as a string
pub fn format_training_info(spec: &RunSpec) -> String {
    let training = &spec.training;
    let mut lines = vec![format!("  Epochs: {}", training.max_epochs)];
    if training.lr_warmup_epochs > 0 {
        lines.push(format!("  Warmup epochs: {}", training.lr_warmup_epochs));
    }
    if training.lr_warmup_steps > 0 {
        lines.push(format!("  Warmup steps: {}", training.lr_warmup_steps));
    }
    if let Some(warmup_initial_lr) = training.warmup_initial_lr {
        lines.push(format!("  Warmup initial lr: {warmup_initial_lr}"));
    }
    if training.lr_cooldown_epochs > 0 {
        lines.push(format!("  Cooldown epochs: {}", training.lr_cooldown_epochs));
    }
    if training.batch_accumulate > 1 {
        lines.push(format!("  Batch accumulation: {}", training.batch_accumulate));
    }
    lines.join("\n")
}

/// Format the decay schedule as a string
pub fn format_schedule_info(spec: &RunSpec) -> String {
    let schedule = &spec.schedule;
    let mut lines = vec![format!("  LR mode: {}", schedule.lr_mode)];
    match schedule.lr_mode.to_lowercase().as_str() {
        "step" => {
            if let Some(freq) = schedule.step_lr_update_freq {
                lines.push(format!("  Update every: {freq} epochs"));
            } else {
                lines.push(format!("  Milestones: {:?}", schedule.lr_updates));
            }
            lines.push(format!("  Decay factor: {}", schedule.lr_decay_factor));
        }
        "exp" => lines.push(format!("  Decay factor: {}", schedule.lr_decay_factor)),
        "cosine" => lines.push(format!("  Final lr ratio: {}", schedule.cosine_final_lr_ratio)),
        "function" => {
            if let Some(name) = &schedule.lr_schedule_function {
                lines.push(format!("  Schedule function: {name}"));
            }
        }
        _ => {}
    }
    lines.join("\n")
}

/// Format the stage switch as a string
pub fn format_stage_switch_info(spec: &RunSpec) -> Option<String> {
    spec.stage_switch
        .map(|switch| format!("  Stage switch at epoch: {}", switch.next_stage_start_epoch))
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &RunSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_run_info(spec));
    println!();
    println!("{}", format_training_info(spec));
    println!();
    println!("{}", format_schedule_info(spec));

    if let Some(switch_info) = format_stage_switch_info(spec) {
        println!();
        println!("{switch_info}");
    }
}

pub fn run_validate(args: ValidateArgs, level: Verbosity) -> Result<(), String> {
    log(level, Verbosity::Normal, &format!("Validating config: {}", args.config.display()));

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, Verbosity::Normal, "Configuration is valid");

    if args.detailed && level != Verbosity::Quiet {
        print_detailed_summary(&spec);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScheduleSpec, StageSwitchSpec, TrainingParams};

    fn make_test_spec() -> RunSpec {
        RunSpec {
            initial_lr: 0.02,
            train_loader_len: 250,
            update_param_groups: true,
            training: TrainingParams {
                max_epochs: 300,
                lr_warmup_epochs: 5,
                lr_cooldown_epochs: 15,
                ..Default::default()
            },
            schedule: ScheduleSpec {
                lr_mode: "step".to_string(),
                lr_updates: vec![100, 200],
                ..Default::default()
            },
            stage_switch: Some(StageSwitchSpec { next_stage_start_epoch: 285 }),
        }
    }

    #[test]
    fn test_format_run_info() {
        let info = format_run_info(&make_test_spec());
        assert!(info.contains("0.02"));
        assert!(info.contains("250"));
        assert!(info.contains("per group"));
    }

    #[test]
    fn test_format_training_info() {
        let info = format_training_info(&make_test_spec());
        assert!(info.contains("Epochs: 300"));
        assert!(info.contains("Warmup epochs: 5"));
        assert!(info.contains("Cooldown epochs: 15"));
        assert!(!info.contains("Warmup steps"));
    }

    #[test]
    fn test_format_schedule_info() {
        let info = format_schedule_info(&make_test_spec());
        assert!(info.contains("LR mode: step"));
        assert!(info.contains("[100, 200]"));
        assert!(info.contains("Decay factor: 0.1"));
    }

    #[test]
    fn test_format_stage_switch_info() {
        let mut spec = make_test_spec();
        assert!(format_stage_switch_info(&spec).unwrap().contains("285"));
        spec.stage_switch = None;
        assert!(format_stage_switch_info(&spec).is_none());
    }
}
