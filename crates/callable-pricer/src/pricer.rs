//! The pricing orchestrator.
//!
//! [`CallablePricer`] binds a base risk-free curve, a bond and a valuation
//! date. Every call builds the curves it needs as new [`CurveHandle`]s
//! (OAS on top of the base, bumps on top of that), so nothing shared is ever
//! modified and there is no state to restore after a failed reprice.

use callable_bonds::{straight_dirty_price, BondGeometry, CallableBondSpec};
use callable_core::Date;
use callable_curves::CurveHandle;
use callable_engines::{
    BlackKarasinskiTreeEngine, CallableEngine, CirPdeEngine, EnginePrice, HullWhiteLsmcEngine,
};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{PricerConfig, Validate};
use crate::error::{PricerError, PricerResult};
use crate::method::{EngineCache, PricingMethod};
use crate::risk::{RiskMetrics, DEGENERATE_PRICE, MIN_BUMP};

/// Spreads at or below this leave the curve untouched.
const ZERO_SPREAD: f64 = 1e-12;

/// Result of one pricing call.
#[derive(Debug, Clone, Serialize)]
pub struct Valuation {
    /// Dirty price less accrued interest.
    pub clean_price: f64,
    /// Engine price including accrued interest.
    pub dirty_price: f64,
    /// Accrued interest at the valuation date.
    pub accrued: f64,
    /// Monte Carlo standard error.
    pub standard_error: Option<f64>,
    /// Engine state to reuse on the next call with the same parameters.
    #[serde(skip)]
    pub cache: Option<EngineCache>,
}

/// Prices one callable bond on one base curve.
#[derive(Debug, Clone)]
pub struct CallablePricer {
    curve: CurveHandle,
    bond: CallableBondSpec,
    valuation_date: Date,
    config: PricerConfig,
    geometry: BondGeometry,
    accrued: f64,
}

impl CallablePricer {
    /// Creates a pricer, validating the configuration and building the geometry.
    pub fn new(
        curve: CurveHandle,
        bond: CallableBondSpec,
        valuation_date: Date,
        config: PricerConfig,
    ) -> PricerResult<Self> {
        config.validate_or_error()?;
        let geometry = bond.geometry(valuation_date)?;
        let accrued = bond.accrued_interest(valuation_date)?;
        let accrued = accrued
            .to_f64()
            .ok_or_else(|| PricerError::invalid_input(format!("accrued interest {accrued}")))?;

        debug!(
            valuation = %valuation_date,
            cashflows = geometry.cashflows.len(),
            calls = geometry.calls.len(),
            accrued,
            "callable pricer ready"
        );

        Ok(Self {
            curve,
            bond,
            valuation_date,
            config,
            geometry,
            accrued,
        })
    }

    /// Base risk-free curve.
    pub fn curve(&self) -> &CurveHandle {
        &self.curve
    }

    /// The bond.
    pub fn bond(&self) -> &CallableBondSpec {
        &self.bond
    }

    /// Valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Numerical settings.
    pub fn config(&self) -> &PricerConfig {
        &self.config
    }

    /// Cashflows and calls after the valuation date.
    pub fn geometry(&self) -> &BondGeometry {
        &self.geometry
    }

    /// Accrued interest at the valuation date.
    pub fn accrued(&self) -> f64 {
        self.accrued
    }

    /// Same bond and settings on another base curve.
    #[must_use]
    pub fn with_curve(&self, curve: CurveHandle) -> Self {
        Self {
            curve,
            ..self.clone()
        }
    }

    /// Prices with `method` on the base curve shifted by `oas`.
    ///
    /// A cache returned by an earlier call with the same method and
    /// parameters keeps the engine's random numbers, grid or tree fixed.
    pub fn calculate(
        &self,
        method: &PricingMethod,
        oas: f64,
        cache: Option<EngineCache>,
    ) -> PricerResult<Valuation> {
        self.calculate_on(&self.curve, method, oas, cache)
    }

    /// Base clean price with effective duration and convexity.
    ///
    /// Both bumped reprices reuse the cache of the base run, so only the
    /// curve moves between the three prices. The returned cache is the one
    /// built by the base run.
    pub fn metrics(
        &self,
        method: &PricingMethod,
        oas: f64,
        cache: Option<EngineCache>,
    ) -> PricerResult<(RiskMetrics, Option<EngineCache>)> {
        let base = self.calculate(method, oas, cache)?;
        let p0 = base.clean_price;
        if p0 <= DEGENERATE_PRICE {
            return Ok((RiskMetrics::degenerate(), base.cache));
        }

        let dy = self.config.risk_bump();
        if dy.abs() < MIN_BUMP {
            return Ok((RiskMetrics::price_only(p0), base.cache));
        }

        let up = self.calculate_on(
            &self.curve.with_parallel_spread(dy),
            method,
            oas,
            base.cache.clone(),
        )?;
        let down = self.calculate_on(
            &self.curve.with_parallel_spread(-dy),
            method,
            oas,
            base.cache.clone(),
        )?;

        let metrics = RiskMetrics::from_bumps(p0, up.clean_price, down.clean_price, dy);
        info!(
            method = method.name(),
            price = metrics.price,
            duration = metrics.effective_duration,
            convexity = metrics.effective_convexity,
            bump = dy,
            "effective risk"
        );
        Ok((metrics, base.cache))
    }

    /// Value of the issuer's call: straight clean price less callable clean price.
    pub fn option_value(&self, method: &PricingMethod, oas: f64) -> PricerResult<f64> {
        let straight = self.calculate(&PricingMethod::StraightBond, oas, None)?;
        let callable = self.calculate(method, oas, None)?;
        Ok(straight.clean_price - callable.clean_price)
    }

    pub(crate) fn calculate_on(
        &self,
        base: &CurveHandle,
        method: &PricingMethod,
        oas: f64,
        cache: Option<EngineCache>,
    ) -> PricerResult<Valuation> {
        let curve = if oas.abs() <= ZERO_SPREAD {
            base.clone()
        } else {
            base.with_parallel_spread(oas)
        };

        let (dirty_price, standard_error, cache) = match method {
            PricingMethod::StraightBond => {
                let price = straight_dirty_price(&self.geometry, &curve)?;
                (price.dirty, None, None)
            }
            PricingMethod::HullWhiteLsmc(params) => {
                let engine = HullWhiteLsmcEngine::new(self.config.mc);
                let cache = take_cache(method, cache, EngineCache::into_monte_carlo)?;
                let out = self.run(&engine, &curve, params, cache)?;
                (out.dirty_price, out.standard_error, Some(EngineCache::MonteCarlo(out.cache)))
            }
            PricingMethod::CirPde(params) => {
                let engine = CirPdeEngine::new(self.config.pde);
                let cache = take_cache(method, cache, EngineCache::into_pde)?;
                let out = self.run(&engine, &curve, params, cache)?;
                (out.dirty_price, out.standard_error, Some(EngineCache::Pde(out.cache)))
            }
            PricingMethod::BlackKarasinskiTree(params) => {
                let engine = BlackKarasinskiTreeEngine::new(self.config.tree);
                let cache = take_cache(method, cache, EngineCache::into_tree)?;
                let out = self.run(&engine, &curve, params, cache)?;
                (out.dirty_price, out.standard_error, Some(EngineCache::Tree(out.cache)))
            }
        };

        Ok(Valuation {
            clean_price: dirty_price - self.accrued,
            dirty_price,
            accrued: self.accrued,
            standard_error,
            cache,
        })
    }

    fn run<E: CallableEngine>(
        &self,
        engine: &E,
        curve: &CurveHandle,
        params: &E::Params,
        cache: Option<E::Cache>,
    ) -> PricerResult<EnginePrice<E::Cache>> {
        debug!(
            engine = engine.name(),
            cached = cache.is_some(),
            spread = curve.spread(),
            "dispatch"
        );
        Ok(engine.price(curve, &self.geometry, params, cache)?)
    }
}

fn take_cache<C>(
    method: &PricingMethod,
    cache: Option<EngineCache>,
    extract: fn(EngineCache) -> Result<C, EngineCache>,
) -> PricerResult<Option<C>> {
    cache
        .map(|c| {
            extract(c).map_err(|other| PricerError::CacheMismatch {
                method: method.name(),
                cache: other.kind(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use callable_core::Frequency;
    use callable_engines::{BlackKarasinskiParams, CirParams, McConfig, PdeConfig, TreeConfig};
    use rust_decimal_macros::dec;

    fn bond(call: bool) -> CallableBondSpec {
        let mut builder = CallableBondSpec::builder()
            .face(dec!(100))
            .coupon_rate(dec!(0.05))
            .frequency(Frequency::SemiAnnual)
            .issue_date(Date::from_ymd(2024, 1, 15).unwrap())
            .maturity_date(Date::from_ymd(2029, 1, 15).unwrap());
        if call {
            builder = builder.add_call(Date::from_ymd(2027, 1, 15).unwrap(), 100.0);
        }
        builder.build().unwrap()
    }

    fn fast_config() -> PricerConfig {
        PricerConfig::default()
            .with_mc(McConfig::default().with_paths(2_000))
            .with_pde(PdeConfig {
                grid_size: 200,
                steps_per_year: 50,
                ..PdeConfig::default()
            })
            .with_tree(TreeConfig { steps_per_year: 24 })
    }

    fn pricer(call: bool, valuation: Date) -> CallablePricer {
        let curve = CurveHandle::flat(0.04).unwrap();
        CallablePricer::new(curve, bond(call), valuation, fast_config()).unwrap()
    }

    #[test]
    fn test_clean_is_dirty_less_accrued() {
        // Two months into the period: 30/360 accrual of 60 days.
        let p = pricer(false, Date::from_ymd(2024, 3, 15).unwrap());
        assert_relative_eq!(p.accrued(), 100.0 * 0.05 * 60.0 / 360.0, epsilon = 1e-12);

        let v = p.calculate(&PricingMethod::StraightBond, 0.0, None).unwrap();
        assert_relative_eq!(v.clean_price, v.dirty_price - p.accrued(), epsilon = 1e-12);
        assert!(v.cache.is_none());
        assert!(v.standard_error.is_none());
    }

    #[test]
    fn test_oas_equals_shifted_curve() {
        let valuation = Date::from_ymd(2024, 1, 15).unwrap();
        let p = pricer(false, valuation);
        let with_oas = p.calculate(&PricingMethod::StraightBond, 0.009, None).unwrap();

        let shifted = p.with_curve(CurveHandle::flat(0.049).unwrap());
        let direct = shifted.calculate(&PricingMethod::StraightBond, 0.0, None).unwrap();
        assert_relative_eq!(with_oas.clean_price, direct.clean_price, max_relative = 1e-12);
    }

    #[test]
    fn test_cache_mismatch() {
        let p = pricer(true, Date::from_ymd(2024, 1, 15).unwrap());
        let tree = PricingMethod::BlackKarasinskiTree(BlackKarasinskiParams::new(0.1, 0.2));
        let cache = p.calculate(&tree, 0.0, None).unwrap().cache;
        assert!(cache.as_ref().is_some_and(|c| c.as_tree().is_some()));

        let pde = PricingMethod::CirPde(CirParams::new(0.04, 0.2, 0.05));
        let err = p.calculate(&pde, 0.0, cache).unwrap_err();
        assert!(matches!(
            err,
            PricerError::CacheMismatch {
                method: "CIR PDE",
                cache: "tree"
            }
        ));
    }

    #[test]
    fn test_invalid_parameters_propagate() {
        let p = pricer(true, Date::from_ymd(2024, 1, 15).unwrap());
        let bad = PricingMethod::BlackKarasinskiTree(BlackKarasinskiParams::new(0.1, -0.2));
        assert!(matches!(
            p.calculate(&bad, 0.0, None),
            Err(PricerError::Engine(_))
        ));
    }

    #[test]
    fn test_zero_bump_reports_price_only() {
        let valuation = Date::from_ymd(2024, 1, 15).unwrap();
        let config = fast_config().with_risk_bump_bps(0.0);
        let curve = CurveHandle::flat(0.04).unwrap();
        let p = CallablePricer::new(curve, bond(false), valuation, config).unwrap();
        let (m, cache) = p.metrics(&PricingMethod::StraightBond, 0.0, None).unwrap();
        assert!(m.price > 0.0);
        assert_eq!(m.effective_duration, 0.0);
        assert_eq!(m.effective_convexity, 0.0);
        assert!(cache.is_none());
    }

    #[test]
    fn test_option_value_non_negative() {
        let p = pricer(true, Date::from_ymd(2024, 1, 15).unwrap());
        let tree = PricingMethod::BlackKarasinskiTree(BlackKarasinskiParams::new(0.1, 0.2));
        let value = p.option_value(&tree, 0.0).unwrap();
        // A 5% coupon on a 4% curve is in the money to call.
        assert!(value > 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = fast_config();
        config.tree.steps_per_year = 0;
        let result = CallablePricer::new(
            CurveHandle::flat(0.04).unwrap(),
            bond(false),
            Date::from_ymd(2024, 1, 15).unwrap(),
            config,
        );
        assert!(matches!(result, Err(PricerError::Validation { .. })));
    }
}
