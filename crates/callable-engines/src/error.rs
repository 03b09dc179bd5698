//! Error types for the pricing engines.

use thiserror::Error;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by a pricing engine.
///
/// Each is fatal for the pricing call that raised it. Per-step tree
/// calibration failures are not errors; they fall back and are reported in
/// the tree solution.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// A model parameter is outside its admissible range.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An engine setting cannot produce a usable discretization.
    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// The continuation-value regression could not be solved.
    #[error("Regression failed at time step {step}: {source}")]
    RegressionFailed {
        /// Time step of the call date.
        step: usize,
        /// Underlying numerical failure.
        source: callable_math::MathError,
    },

    /// Numerical failure outside the regression.
    #[error("Math error: {0}")]
    Math(#[from] callable_math::MathError),

    /// Curve lookup failed.
    #[error("Curve error: {0}")]
    Curve(#[from] callable_curves::CurveError),
}

impl EngineError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
