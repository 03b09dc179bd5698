//! # Callable Core
//!
//! Foundational types shared by the callable bond pricing workspace:
//!
//! - **Types**: [`Date`] and [`Frequency`]
//! - **Day Count Conventions**: year fractions used to place cashflows and
//!   exercise dates on the engines' time axis
//!
//! ## Example
//!
//! ```rust
//! use callable_core::prelude::*;
//!
//! let start = Date::from_ymd(2025, 9, 10).unwrap();
//! let end = Date::from_ymd(2035, 12, 2).unwrap();
//! let t = DayCountConvention::Thirty360US.year_fraction_f64(start, end);
//! assert!(t > 10.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::doc_markdown)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{Act360, Act365Fixed, DayCount, DayCountConvention, Thirty360US};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency};
}

pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency};
