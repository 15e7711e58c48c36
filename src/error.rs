//! Error types for cmd-runner.

use std::time::Duration;

use thiserror::Error;

/// Main error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The subprocess did not finish within the configured deadline and
    /// was forcibly terminated.
    #[error("`{command}` timeout after {timeout:?}")]
    Timeout {
        /// Space-joined command line, as logged.
        command: String,
        /// The configured deadline.
        timeout: Duration,
    },

    /// The subprocess exited with a non-zero status.
    #[error("`{command}` failed: {stderr}")]
    Failed {
        /// Space-joined command line, as logged.
        command: String,
        /// Trimmed standard-error text.
        stderr: String,
        /// Trimmed standard-output captured before the failure.
        output: String,
    },

    /// I/O error, typically a spawn failure (missing binary, permissions).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Best-effort standard-output captured before the error.
    ///
    /// Non-zero exits still produce whatever stdout the subprocess wrote;
    /// timeout and spawn errors carry none.
    pub fn output(&self) -> &str {
        match self {
            CommandError::Failed { output, .. } => output,
            _ => "",
        }
    }
}

/// Convenience Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;
