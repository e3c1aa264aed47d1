//! Error handling for gearspec.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for gearspec operations.
///
/// Every error aborts the current operation and propagates to `main`,
/// which exits non-zero. Nothing is caught and retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Missing packager identity, missing template file, invalid input
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Directory or file creation conflicts while staging a package
    #[error("Filesystem error: {0}.")]
    FileSystemError(String),

    /// An invoked external tool or git operation failed
    #[error("External tool error: step '{step}': {tool}: {detail}.")]
    ExternalToolError { step: &'static str, tool: &'static str, detail: String },

    /// Self-test output does not match the reference directory
    #[error("Verification error: {0}.")]
    VerificationError(String),
}

impl Error {
    /// Shorthand for step failures in the upstream pipeline.
    pub fn external(
        step: &'static str,
        tool: &'static str,
        detail: impl std::fmt::Display,
    ) -> Self {
        Error::ExternalToolError { step, tool, detail: detail.to_string() }
    }
}

/// Convenience type alias for Results with gearspec's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
