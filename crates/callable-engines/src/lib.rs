//! # Callable Engines
//!
//! Three independent numerical pricers for a callable fixed-coupon bond,
//! each under its own one-factor short-rate model:
//!
//! - **Hull-White Monte Carlo**: [`HullWhiteLsmcEngine`], Longstaff-Schwartz
//!   exercise on a quadratic basis in the OU state
//! - **CIR PDE**: [`CirPdeEngine`], Crank-Nicolson on a uniform rate grid
//!   with the call price as an upper obstacle
//! - **Black-Karasinski tree**: [`BlackKarasinskiTreeEngine`], a trinomial
//!   lattice in the log rate, forward-calibrated to the curve
//!
//! All engines implement [`CallableEngine`]. They return a dirty price and a
//! cache of curve-independent state; feeding the cache back for a bumped
//! curve keeps random numbers, grids and exercise policy fixed.
//!
//! ## Example
//!
//! ```rust
//! use callable_engines::prelude::*;
//! use callable_bonds::{BondGeometry, Cashflow};
//! use callable_core::Date;
//! use callable_curves::CurveHandle;
//!
//! let geometry = BondGeometry {
//!     maturity: 2.0,
//!     coupon_amount: 0.0,
//!     redemption: 100.0,
//!     cashflows: vec![Cashflow {
//!         date: Date::from_ymd(2027, 1, 1).unwrap(),
//!         time: 2.0,
//!         amount: 100.0,
//!     }],
//!     calls: vec![],
//! };
//!
//! let engine = BlackKarasinskiTreeEngine::default();
//! let params = BlackKarasinskiParams::new(0.1, 0.2);
//! let out = engine.price(&CurveHandle::flat(0.04).unwrap(), &geometry, &params, None).unwrap();
//! assert!((out.dirty_price - 100.0 * (-0.08_f64).exp()).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod black_karasinski_tree;
pub mod cir_pde;
pub mod config;
pub mod engine;
pub mod error;
pub mod hull_white_lsmc;
pub mod params;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::black_karasinski_tree::{BlackKarasinskiTreeEngine, TreeCache, TreeSolution};
    pub use crate::cir_pde::{CirPdeEngine, PdeCache, PdeSolution};
    pub use crate::config::{McConfig, PdeConfig, TreeConfig};
    pub use crate::engine::{CallableEngine, EnginePrice};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::hull_white_lsmc::{HullWhiteLsmcEngine, McCache};
    pub use crate::params::{BlackKarasinskiParams, CirParams, HullWhiteParams};
}

pub use black_karasinski_tree::{BlackKarasinskiTreeEngine, TreeCache};
pub use cir_pde::{CirPdeEngine, PdeCache};
pub use config::{McConfig, PdeConfig, TreeConfig};
pub use engine::{CallableEngine, EnginePrice};
pub use error::{EngineError, EngineResult};
pub use hull_white_lsmc::{HullWhiteLsmcEngine, McCache};
pub use params::{BlackKarasinskiParams, CirParams, HullWhiteParams};
