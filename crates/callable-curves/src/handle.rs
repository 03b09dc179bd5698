//! Immutable, shareable curve handles.

use std::sync::Arc;

use crate::curves::FlatCurve;
use crate::error::CurveResult;
use crate::traits::{check_time, YieldCurve};

/// A reference-counted curve plus a parallel continuously compounded spread.
///
/// Cloning is cheap and never copies curve data. [`with_parallel_spread`]
/// returns a new handle whose discount factors are the original ones scaled
/// by `exp(-s·t)`; the handle it was derived from is unaffected.
///
/// [`with_parallel_spread`]: CurveHandle::with_parallel_spread
#[derive(Debug, Clone)]
pub struct CurveHandle {
    base: Arc<dyn YieldCurve>,
    spread: f64,
}

impl CurveHandle {
    /// Wraps a curve with zero spread.
    pub fn new<C: YieldCurve + 'static>(curve: C) -> Self {
        Self::from_arc(Arc::new(curve))
    }

    /// Wraps an already shared curve with zero spread.
    #[must_use]
    pub fn from_arc(base: Arc<dyn YieldCurve>) -> Self {
        Self { base, spread: 0.0 }
    }

    /// Handle on a flat continuously compounded curve. Fails if `rate` is not finite.
    pub fn flat(rate: f64) -> CurveResult<Self> {
        Ok(Self::new(FlatCurve::new(rate)?))
    }

    /// Returns a handle shifted by a further `spread` (decimal, continuous).
    #[must_use]
    pub fn with_parallel_spread(&self, spread: f64) -> Self {
        Self {
            base: Arc::clone(&self.base),
            spread: self.spread + spread,
        }
    }

    /// Total spread applied on top of the underlying curve.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Whether two handles share the same underlying curve object.
    #[must_use]
    pub fn shares_curve_with(&self, other: &CurveHandle) -> bool {
        Arc::ptr_eq(&self.base, &other.base)
    }

    fn checked_spread(&self) -> CurveResult<f64> {
        check_time(self.spread)?;
        Ok(self.spread)
    }
}

impl YieldCurve for CurveHandle {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        let spread = self.checked_spread()?;
        let df = self.base.discount_factor(t)?;
        Ok(df * (-spread * t.max(0.0)).exp())
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.base.zero_rate(t)? + self.checked_spread()?)
    }

    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        Ok(self.base.forward_rate(t1, t2)? + self.checked_spread()?)
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        Ok(self.base.instantaneous_forward(t)? + self.checked_spread()?)
    }
}
