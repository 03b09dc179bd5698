//! # Callable Pricer
//!
//! Orchestration on top of the callable bond engines.
//!
//! - **Dispatch**: [`PricingMethod`] selects the straight-bond reference or
//!   one of the three short-rate engines, with its parameters
//! - **OAS**: a constant spread over the risk-free curve, applied as a new
//!   curve handle for each call
//! - **Risk**: effective duration and convexity by symmetric bumps, reusing
//!   the base run's engine state
//! - **Sweeps**: price against volatility, rate level and OAS
//! - **Configuration**: [`PricerConfig`] from TOML or JSON
//!
//! ## Example
//!
//! ```rust
//! use callable_pricer::prelude::*;
//! use callable_bonds::CallableBondSpec;
//! use callable_core::{Date, Frequency};
//! use callable_curves::CurveHandle;
//! use callable_engines::{BlackKarasinskiParams, TreeConfig};
//! use rust_decimal_macros::dec;
//!
//! let valuation = Date::from_ymd(2025, 1, 15).unwrap();
//! let bond = CallableBondSpec::builder()
//!     .face(dec!(100))
//!     .coupon_rate(dec!(0.035))
//!     .frequency(Frequency::SemiAnnual)
//!     .issue_date(valuation)
//!     .maturity_date(Date::from_ymd(2035, 1, 15).unwrap())
//!     .add_call(Date::from_ymd(2030, 1, 15).unwrap(), 100.0)
//!     .build()
//!     .unwrap();
//!
//! let config = PricerConfig::default().with_tree(TreeConfig { steps_per_year: 12 });
//! let curve = CurveHandle::flat(0.04).unwrap();
//! let pricer = CallablePricer::new(curve, bond, valuation, config).unwrap();
//!
//! let tree = PricingMethod::BlackKarasinskiTree(BlackKarasinskiParams::new(0.1, 0.2));
//! let (risk, _cache) = pricer.metrics(&tree, 0.0, None).unwrap();
//! assert!(risk.effective_duration > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod method;
pub mod pricer;
pub mod risk;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{PricerConfig, Validate, ValidationError};
    pub use crate::error::{PricerError, PricerResult};
    pub use crate::method::{EngineCache, PricingMethod};
    pub use crate::pricer::{CallablePricer, Valuation};
    pub use crate::risk::RiskMetrics;
    pub use crate::sensitivity::{
        price_vs_oas, price_vs_rate_shift, price_vs_volatility, Scenario, SweepAxis, SweepRow,
        SweepTable,
    };
}

pub use config::{PricerConfig, Validate, ValidationError};
pub use error::{PricerError, PricerResult};
pub use method::{EngineCache, PricingMethod};
pub use pricer::{CallablePricer, Valuation};
pub use risk::RiskMetrics;
pub use sensitivity::{Scenario, SweepAxis, SweepRow, SweepTable};
