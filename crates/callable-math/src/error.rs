//! Numerical failure modes.

use thiserror::Error;

/// Result alias for the numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Why a numerical routine could not produce an answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The root search ran out of iterations.
    #[error("Root search stopped after {iterations} iterations with residual {residual:.2e}")]
    ConvergenceFailed {
        /// Iterations used.
        iterations: u32,
        /// Residual at the last iterate.
        residual: f64,
    },

    /// The search interval does not straddle a sign change.
    #[error("No sign change on [{a}, {b}]: f(a) = {fa:.2e}, f(b) = {fb:.2e}")]
    InvalidBracket {
        /// Left end.
        a: f64,
        /// Right end.
        b: f64,
        /// Value at the left end.
        fa: f64,
        /// Value at the right end.
        fb: f64,
    },

    /// A linear system has a zero or non-finite pivot.
    #[error("Linear system is singular")]
    SingularMatrix,

    /// Too few observations for the requested fit.
    #[error("Need {required} observations, got {actual}")]
    InsufficientData {
        /// Observations needed.
        required: usize,
        /// Observations given.
        actual: usize,
    },

    /// Inputs with inconsistent shapes or values.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Root search exhausted its iteration budget.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Inconsistent inputs.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
