//! Error types for callback dispatch and learning-rate scheduling
//!
//! Every variant carries the offending value and, where one exists, the set
//! of acceptable alternatives so a failed run can be fixed from the message
//! alone.

use thiserror::Error;

/// Result type alias for cadencia operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building schedulers or dispatching phases.
#[derive(Error, Debug)]
pub enum Error {
    /// Two mutually exclusive constructor arguments were both supplied.
    #[error("{policy}: only one of [{first}, {second}] may be supplied")]
    ConflictingArguments {
        policy: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// A metric-driven scheduler referenced a metric the loop did not report.
    #[error("Illegal metric name: {metric_name}. Expected one of metrics keys: {valid:?}")]
    IllegalMetric { metric_name: String, valid: Vec<String> },

    /// The `function` schedule mode has no registered function to call.
    #[error("No schedule function registered under '{name}'. Available: {available:?}")]
    MissingScheduleFunction { name: String, available: Vec<String> },

    /// Unknown learning-rate mode in configuration.
    #[error("Unknown lr_mode: {mode}. Valid modes are: {valid:?}")]
    UnknownLrMode { mode: String, valid: Vec<&'static str> },

    /// A numeric parameter is outside of its valid range.
    #[error("Invalid parameter '{field}': {message}")]
    InvalidParameter { field: &'static str, message: String },

    /// A callback needed a context field the training loop did not supply.
    #[error("{callback} requires context field '{field}', which was not set")]
    MissingContextField { callback: &'static str, field: &'static str },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the error originates from run configuration rather than from
    /// the training loop's wiring.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConflictingArguments { .. }
                | Self::MissingScheduleFunction { .. }
                | Self::UnknownLrMode { .. }
                | Self::InvalidParameter { .. }
                | Self::ConfigError(_)
        )
    }
}
