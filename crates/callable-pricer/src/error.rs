//! Error types for the pricing orchestrator.

use thiserror::Error;

use crate::config::ValidationError;

/// A specialized Result type for orchestrator operations.
pub type PricerResult<T> = Result<T, PricerError>;

/// Errors raised while pricing or configuring.
#[derive(Error, Debug)]
pub enum PricerError {
    /// An engine call failed.
    #[error("Engine error: {0}")]
    Engine(#[from] callable_engines::EngineError),

    /// The bond could not produce its geometry or accrued interest.
    #[error("Bond error: {0}")]
    Bond(#[from] callable_bonds::BondError),

    /// A curve lookup failed.
    #[error("Curve error: {0}")]
    Curve(#[from] callable_curves::CurveError),

    /// A cache from one engine was handed to another.
    #[error("Cache mismatch: {method} cannot use a {cache} cache")]
    CacheMismatch {
        /// Requested pricing method.
        method: &'static str,
        /// Kind of cache supplied.
        cache: &'static str,
    },

    /// A value could not be represented for the engines.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration validation error.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validation error message.
        message: String,
    },

    /// Multiple validation errors.
    #[error("Multiple validation errors: {0:?}")]
    MultipleValidationErrors(Vec<ValidationError>),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text could not be parsed.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl PricerError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<toml::de::Error> for PricerError {
    fn from(err: toml::de::Error) -> Self {
        PricerError::Deserialization(err.to_string())
    }
}

impl From<serde_json::Error> for PricerError {
    fn from(err: serde_json::Error) -> Self {
        PricerError::Deserialization(err.to_string())
    }
}
