//! Error types for core operations.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date and convention handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unknown or unsupported convention name.
    #[error("Unsupported convention: {name}")]
    UnsupportedConvention {
        /// The convention that could not be resolved.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }
}
