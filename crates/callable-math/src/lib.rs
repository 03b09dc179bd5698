//! # Callable Math
//!
//! Numerical utilities used by the pricing engines:
//!
//! - **Solvers**: Brent root finding for per-step tree calibration
//! - **Linear Algebra**: factorized tri-diagonal systems for Crank-Nicolson
//!   stepping, where one factorization serves every time step of a solve
//! - **Regression**: least-squares fits on a polynomial basis for
//!   continuation-value estimation
//! - **Interpolation**: clamped piecewise-linear lookup on a grid

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod regression;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::interp_clamped;
    pub use crate::linear_algebra::{TridiagonalLu, TridiagonalMatrix};
    pub use crate::regression::{quadratic_least_squares, QuadraticFit};
    pub use crate::solvers::{brent, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
