//! Verbosity handling for CLI output

/// How much a command prints to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Diagnostic level handed to the `tracing` subscriber
    pub fn tracing_level(self) -> crate::logging::LogLevel {
        use crate::logging::LogLevel;
        match self {
            Verbosity::Quiet => LogLevel::Error,
            Verbosity::Normal => LogLevel::Warn,
            Verbosity::Verbose => LogLevel::Debug,
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: Verbosity, required: Verbosity, msg: &str) {
    if level != Verbosity::Quiet && (level == required || required == Verbosity::Normal) {
        println!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }

    #[test]
    fn test_tracing_level() {
        assert_eq!(Verbosity::Quiet.tracing_level(), LogLevel::Error);
        assert_eq!(Verbosity::Verbose.tracing_level(), LogLevel::Debug);
    }
}
