//! Entry points for YAML run configuration

use super::schema::RunSpec;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load, parse and validate a run specification from a YAML file
///
/// # Example
///
/// ```no_run
/// use cadencia::config::load_config;
///
/// let spec = load_config("configs/cosine.yaml")?;
/// println!("{} epochs", spec.training.max_epochs);
/// # Ok::<(), cadencia::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<RunSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    parse_config(&yaml_content)
}

/// Parse and validate a run specification from YAML text
pub fn parse_config(yaml_content: &str) -> Result<RunSpec> {
    let spec: RunSpec = serde_yaml::from_str(yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;

    validate_config(&spec)?;
    Ok(spec)
}
