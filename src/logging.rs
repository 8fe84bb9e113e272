//! Leveled logging capability injected into dispatchers and schedulers
//!
//! Schedulers report salvageable configuration problems (capped warmup,
//! ignored cooldown) as warnings. Instead of writing to a process-wide
//! logger they receive a [`PhaseLogger`] at construction, so tests can
//! observe exactly what was reported.
//!
//! - `TracingLogger` - forwards to the `tracing` macros
//! - `RecordingLogger` - keeps every message in memory
//! - `init_tracing` - installs a `tracing-subscriber` fmt subscriber

use crate::error::{Error, Result};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::{fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::EnvFilter;

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name, as understood by `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leveled logging operations
pub trait PhaseLogger: Send + Sync {
    /// Emit a message at the given level
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Shared handle to a logger
pub type SharedLogger = Arc<dyn PhaseLogger>;

/// Logger that forwards every message to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PhaseLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "cadencia", "{message}"),
            LogLevel::Info => tracing::info!(target: "cadencia", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "cadencia", "{message}"),
            LogLevel::Error => tracing::error!(target: "cadencia", "{message}"),
        }
    }
}

/// Default logger handle used when the caller does not inject one
pub fn default_logger() -> SharedLogger {
    Arc::new(TracingLogger)
}

/// Logger that stores messages in memory
///
/// # Example
///
/// ```rust
/// use cadencia::logging::{LogLevel, PhaseLogger, RecordingLogger};
///
/// let logger = RecordingLogger::new();
/// logger.warn("capped");
/// assert_eq!(logger.count(LogLevel::Warn), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared handle, returning both the concrete logger and the
    /// trait object to inject
    pub fn shared() -> (Arc<Self>, SharedLogger) {
        let logger = Arc::new(Self::new());
        let handle: SharedLogger = logger.clone();
        (logger, handle)
    }

    /// All recorded messages in emission order
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages recorded at exactly `level`
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// Number of messages recorded at exactly `level`
    pub fn count(&self, level: LogLevel) -> usize {
        self.messages(level).len()
    }
}

impl PhaseLogger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Single-line output without colors
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` overrides `level` when set. Fails if a subscriber has already
/// been installed.
pub fn init_tracing(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => {
            registry.with(subscriber_fmt::layer().pretty().with_writer(std::io::stderr)).try_init()
        }
        LogFormat::Compact => registry
            .with(subscriber_fmt::layer().compact().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => {
            registry.with(subscriber_fmt::layer().json().with_writer(std::io::stderr)).try_init()
        }
    };

    installed.map_err(|e| Error::ConfigError(format!("Failed to initialize tracing: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_logger_counts_by_level() {
        let logger = RecordingLogger::new();
        logger.warn("a");
        logger.info("b");
        logger.warn("c");
        assert_eq!(logger.count(LogLevel::Warn), 2);
        assert_eq!(logger.count(LogLevel::Info), 1);
        assert_eq!(logger.count(LogLevel::Error), 0);
        assert_eq!(logger.messages(LogLevel::Warn), vec!["a", "c"]);
    }

    #[test]
    fn test_shared_handle_records_into_same_logger() {
        let (recorder, handle) = RecordingLogger::shared();
        handle.error("boom");
        assert_eq!(recorder.records(), vec![(LogLevel::Error, "boom".to_string())]);
    }

    #[test]
    fn test_tracing_logger_does_not_panic_without_subscriber() {
        let logger = TracingLogger;
        logger.debug("no subscriber installed");
        logger.warn("still fine");
    }

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert!(LogLevel::Error > LogLevel::Info);
    }
}
