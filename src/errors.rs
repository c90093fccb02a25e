//! Unified error types for the catalog core and the console shell.
//!
//! Lookups that can miss return `Option` instead of an error; these variants only cover
//! configuration problems, form validation at the input boundary and shell I/O.

use thiserror::Error;

/// Errors surfaced by configuration loading, form validation and the console shell.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment could not be read or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description of the problem
        message: String,
    },

    /// A form field failed validation and the submission was blocked
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending form field
        field: &'static str,
        /// Inline message shown next to the field
        message: String,
    },

    /// A console command could not be understood
    #[error("Command error: {message}")]
    Command {
        /// Parser output or usage hint
        message: String,
    },

    /// I/O error while reading configuration or talking to the terminal
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting a reply failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
