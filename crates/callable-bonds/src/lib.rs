//! # Callable Bonds
//!
//! Instrument definitions for the callable bond pricer.
//!
//! - **Instruments**: [`CallableBondSpec`] with a Bermudan [`CallEntry`] list
//! - **Schedule**: unadjusted coupon dates rolled backward from maturity
//! - **Geometry**: [`BondGeometry`], the cashflow and call lists placed on the
//!   engines' time axis, already filtered to events after the valuation date
//! - **Pricing**: straight (non-callable) discounting used as a reference
//!
//! ## Example
//!
//! ```rust
//! use callable_bonds::prelude::*;
//! use callable_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let bond = CallableBondSpec::builder()
//!     .face(dec!(100))
//!     .coupon_rate(dec!(0.035))
//!     .frequency(Frequency::SemiAnnual)
//!     .issue_date(Date::from_ymd(2025, 1, 15).unwrap())
//!     .maturity_date(Date::from_ymd(2045, 1, 15).unwrap())
//!     .add_call(Date::from_ymd(2037, 1, 15).unwrap(), 100.0)
//!     .build()
//!     .unwrap();
//!
//! let geometry = bond.geometry(Date::from_ymd(2025, 1, 15).unwrap()).unwrap();
//! assert_eq!(geometry.cashflows.len(), 40);
//! assert_eq!(geometry.calls.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap)]

pub mod error;
pub mod geometry;
pub mod instruments;
pub mod pricing;
pub mod schedule;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{BondError, BondResult};
    pub use crate::geometry::{BondGeometry, CallEvent, Cashflow};
    pub use crate::instruments::{CallEntry, CallableBondSpec, CallableBondSpecBuilder};
    pub use crate::pricing::{straight_dirty_price, StraightBondPrice};
    pub use crate::schedule::coupon_schedule;
}

pub use error::{BondError, BondResult};
pub use geometry::{BondGeometry, CallEvent, Cashflow};
pub use instruments::{CallEntry, CallableBondSpec};
pub use pricing::{straight_dirty_price, StraightBondPrice};
