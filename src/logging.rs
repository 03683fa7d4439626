//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The quiz views own the terminal, so interactive commands only log when a
//! log file is given. Non-interactive commands log to stderr.
//!
//! The filter is read from `COURSE_QUIZ_LOG` (same syntax as `RUST_LOG`)
//! and defaults to `course_quiz=info`, or `course_quiz=debug` when verbose.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "COURSE_QUIZ_LOG";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Disabled,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub target: LogTarget,
    pub verbose: bool,
}

impl LogConfig {
    /// Config for a command that takes over the terminal.
    pub fn interactive(log_file: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            target: log_file.map_or(LogTarget::Disabled, LogTarget::File),
            verbose,
        }
    }

    /// Config for a command that prints to the terminal normally.
    pub fn batch(log_file: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            target: log_file.map_or(LogTarget::Stderr, LogTarget::File),
            verbose,
        }
    }

    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "course_quiz=debug"
        } else {
            "course_quiz=info"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install the global subscriber.
pub fn init(config: &LogConfig) -> io::Result<()> {
    match &config.target {
        LogTarget::Disabled => Ok(()),
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(config.filter())
                .with_writer(io::stderr)
                .with_target(false)
                .init();
            Ok(())
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(config.filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_without_file_is_silent() {
        let config = LogConfig::interactive(None, false);
        assert_eq!(config.target, LogTarget::Disabled);

        let config = LogConfig::interactive(Some(PathBuf::from("quiz.log")), true);
        assert_eq!(config.target, LogTarget::File(PathBuf::from("quiz.log")));
        assert_eq!(config.default_directive(), "course_quiz=debug");
    }

    #[test]
    fn test_batch_defaults_to_stderr() {
        let config = LogConfig::batch(None, false);
        assert_eq!(config.target, LogTarget::Stderr);
        assert_eq!(config.default_directive(), "course_quiz=info");
    }
}
