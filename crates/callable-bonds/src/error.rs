//! Failures while defining a bond or placing it on the time axis.

use thiserror::Error;

/// Result alias for instrument operations.
pub type BondResult<T> = Result<T, BondError>;

/// Instrument definition and geometry errors.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// The terms are inconsistent (non-positive face, calls on or after maturity, ...).
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// What is wrong with the terms.
        reason: String,
    },

    /// The builder was not given a required term.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Builder field name.
        field: String,
    },

    /// Valuation date is on or after maturity.
    #[error("Valuation date {valuation} is not before maturity {maturity}")]
    ValuationAfterMaturity {
        /// Valuation date.
        valuation: String,
        /// Maturity date.
        maturity: String,
    },

    /// Date arithmetic failed while rolling the schedule.
    #[error("Date error: {0}")]
    CoreError(#[from] callable_core::CoreError),

    /// Discounting failed in the straight-bond reference.
    #[error("Curve error: {0}")]
    CurveError(#[from] callable_curves::CurveError),
}

impl BondError {
    /// Inconsistent terms.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// A required builder term is missing.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
