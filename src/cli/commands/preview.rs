//! Preview command implementation

use crate::cli::logging::log;
use crate::cli::Verbosity;
use crate::config::{
    apply_overrides, build_callbacks, load_config, validate_config, PreviewArgs, PreviewFormat,
    RunSpec,
};
use crate::logging::default_logger;
use crate::optim::ScheduleFnRegistry;
use crate::train::{simulate_run, LrSample};
use serde::Serialize;

/// JSON document printed by `preview --format json`
#[derive(Debug, Serialize)]
pub struct PreviewReport<'a> {
    pub lr_mode: &'a str,
    pub initial_lr: f64,
    pub max_epochs: usize,
    pub train_loader_len: usize,
    pub samples: &'a [LrSample],
}

/// Render samples as an aligned two-column table
pub fn format_table(samples: &[LrSample]) -> String {
    let mut lines = vec![format!("{:>6}  {:>14}", "epoch", "lr")];
    lines.extend(samples.iter().map(|s| format!("{:>6}  {:>14.8}", s.epoch, s.lr)));
    lines.join("\n")
}

/// Render samples with run metadata as pretty JSON
pub fn format_json(spec: &RunSpec, samples: &[LrSample]) -> Result<String, String> {
    let report = PreviewReport {
        lr_mode: &spec.schedule.lr_mode,
        initial_lr: spec.initial_lr,
        max_epochs: spec.training.max_epochs,
        train_loader_len: spec.train_loader_len,
        samples,
    };
    serde_json::to_string_pretty(&report).map_err(|e| format!("Failed to serialize preview: {e}"))
}

/// Simulate the configured run and return the per-epoch samples
pub fn preview_spec(spec: &RunSpec) -> Result<Vec<LrSample>, String> {
    let registry = ScheduleFnRegistry::with_builtins();
    let mut manager = build_callbacks(spec, &registry, None, default_logger())
        .map_err(|e| format!("Failed to build schedule: {e}"))?;
    simulate_run(spec, &mut manager).map_err(|e| format!("Simulation failed: {e}"))
}

pub fn run_preview(args: PreviewArgs, level: Verbosity) -> Result<(), String> {
    log(level, Verbosity::Verbose, &format!("Loading config: {}", args.config.display()));

    let mut spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    let samples = preview_spec(&spec)?;
    let output = match args.format {
        PreviewFormat::Table => format_table(&samples),
        PreviewFormat::Json => format_json(&spec, &samples)?,
    };
    println!("{output}");

    log(
        level,
        Verbosity::Verbose,
        &format!("Simulated {} epochs x {} batches", spec.training.max_epochs, spec.train_loader_len),
    );
    Ok(())
}
