//! The interface shared by the pricing engines.

use callable_bonds::BondGeometry;
use callable_curves::CurveHandle;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Output of one engine call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginePrice<C> {
    /// Dirty present value at the valuation date.
    pub dirty_price: f64,
    /// Standard error of the estimate, for simulation engines.
    pub standard_error: Option<f64>,
    /// State to hand back on the next call for the same parameters.
    pub cache: C,
}

/// A callable bond pricer under a one-factor short-rate model.
///
/// Engines are pure functions of their inputs and the cache they are given.
/// The first call for a parameter set (no cache, or a cache built for other
/// parameters) is the base run; later calls with the returned cache reuse
/// its curve-independent state, so repricing on a shifted curve isolates
/// the curve sensitivity from discretization and simulation noise.
pub trait CallableEngine {
    /// Model parameters.
    type Params;
    /// Curve-independent state reused across calls.
    type Cache;

    /// Engine name for logs and reports.
    fn name(&self) -> &'static str;

    /// Prices the bond described by `geometry` on `curve`.
    fn price(
        &self,
        curve: &CurveHandle,
        geometry: &BondGeometry,
        params: &Self::Params,
        cache: Option<Self::Cache>,
    ) -> EngineResult<EnginePrice<Self::Cache>>;
}
