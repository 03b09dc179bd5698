//! Error types for curve operations.

use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A time argument was NaN or infinite.
    #[error("Invalid curve time: {t}")]
    InvalidTime {
        /// The offending time in years.
        t: f64,
    },

    /// Not enough pillars to build the curve.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Pillar times are not strictly increasing.
    #[error("Non-monotonic tenors at index {index}: {prev:.4} >= {current:.4}")]
    NonMonotonicTenors {
        /// Index where monotonicity violation occurred.
        index: usize,
        /// Previous tenor value.
        prev: f64,
        /// Current tenor value.
        current: f64,
    },

    /// A pillar value is unusable (non-positive discount factor, NaN rate).
    #[error("Invalid curve value: {reason}")]
    InvalidValue {
        /// Description of the problem.
        reason: String,
    },
}

impl CurveError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}
