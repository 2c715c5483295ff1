// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the settings crate.
//!
//! The settings store itself never fails: unknown names and unresolvable
//! references are ordinary outcomes. Errors only arise while producing
//! declarations from configuration files or other sources.

use thiserror::Error;

/// The main error type for loading settings.
///
/// # Examples
///
/// ```
/// use portcfg::domain::errors::ConfigError;
///
/// let error = ConfigError::ParseError {
///     line: 3,
///     message: "expected NAME=value".to_string(),
/// };
/// assert_eq!(error.to_string(), "Parse error at line 3: expected NAME=value");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A configuration file contained a line that is not a valid assignment.
    #[error("Parse error at line {line}: {message}")]
    ParseError {
        /// 1-based physical line number where the bad assignment starts
        line: usize,
        /// The error message
        message: String,
    },

    /// An error occurred in a settings source.
    #[error("Settings source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `ParseError` for the given line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Wraps a `ParseError` raised by a named source, keeping the line number in the message.
    pub fn in_source(self, source_name: &str) -> Self {
        match self {
            ConfigError::ParseError { line, message } => ConfigError::SourceError {
                source_name: source_name.to_string(),
                message: format!("line {}: {}", line, message),
                source: None,
            },
            other => other,
        }
    }
}

/// A specialized Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
