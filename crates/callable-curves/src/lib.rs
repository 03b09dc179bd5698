//! # Callable Curves
//!
//! Term structures consumed by the callable bond engines.
//!
//! - **Curve Trait**: [`YieldCurve`] exposes discount factors, continuously
//!   compounded zero and forward rates, and instantaneous forwards, all keyed
//!   by year fraction from the valuation date
//! - **Curve Types**: [`FlatCurve`] and the pillar-based [`DiscountCurve`]
//! - **Handles**: [`CurveHandle`] is a cheap, immutable, shareable reference to
//!   a curve carrying a parallel spread. Shifting a handle returns a new
//!   handle and never touches the underlying curve, so bump-and-reprice needs
//!   no restore step.
//!
//! ## Quick Start
//!
//! ```rust
//! use callable_curves::prelude::*;
//!
//! let base = CurveHandle::flat(0.04).unwrap();
//! let shifted = base.with_parallel_spread(0.0025);
//!
//! let df = base.discount_factor(5.0).unwrap();
//! let df_shifted = shifted.discount_factor(5.0).unwrap();
//! assert!((df_shifted - df * (-0.0025_f64 * 5.0).exp()).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod curves;
pub mod error;
pub mod handle;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curves::{DiscountCurve, FlatCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::handle::CurveHandle;
    pub use crate::traits::YieldCurve;
}

pub use curves::{DiscountCurve, FlatCurve};
pub use error::{CurveError, CurveResult};
pub use handle::CurveHandle;
pub use traits::YieldCurve;
