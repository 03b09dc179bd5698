//! CIR short-rate PDE solved by Crank-Nicolson with an early-exercise obstacle.
//!
//! The bond value `V(r, t)` solves
//!
//! ```text
//! V_t + k(θ - r) V_r + ½σ²r V_rr - r V = 0
//! ```
//!
//! on a uniform rate grid, marched backward from maturity. Coupons are
//! added as jumps; at a call date the value is capped at the call price
//! plus the coincident coupon.

use std::sync::Arc;

use callable_bonds::BondGeometry;
use callable_curves::{CurveHandle, YieldCurve};
use callable_math::interpolation::interp_clamped;
use callable_math::linear_algebra::{TridiagonalLu, TridiagonalMatrix};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PdeConfig;
use crate::engine::{CallableEngine, EnginePrice};
use crate::error::{EngineError, EngineResult};
use crate::params::CirParams;

/// Maturity at which the curve's short rate is read.
const SHORT_RATE_TENOR: f64 = 0.001;

/// The grid after one call obstacle was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleCheck {
    /// Call time.
    pub time: f64,
    /// Call price plus coincident coupon.
    pub cap: f64,
    /// Largest grid value after capping.
    pub max_value: f64,
}

/// Base-run short rate and the rate grid.
#[derive(Debug, Clone)]
pub struct PdeCache {
    params: CirParams,
    config: PdeConfig,
    r0_base: f64,
    rates: Arc<Vec<f64>>,
}

impl PdeCache {
    fn new(params: CirParams, config: PdeConfig, r0_base: f64) -> Self {
        let m = config.grid_size;
        let span = config.r_max - config.r_min;
        let rates = (0..m)
            .map(|i| config.r_min + span * i as f64 / (m - 1) as f64)
            .collect();
        Self {
            params,
            config,
            r0_base,
            rates: Arc::new(rates),
        }
    }

    fn is_compatible(&self, params: &CirParams, config: &PdeConfig) -> bool {
        self.params == *params && self.config == *config
    }

    /// Short rate read from the curve on the base run.
    pub fn r0_base(&self) -> f64 {
        self.r0_base
    }

    /// Rate grid nodes.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }
}

/// Everything a PDE solve produces.
#[derive(Debug, Clone)]
pub struct PdeSolution {
    /// Price and cache.
    pub price: EnginePrice<PdeCache>,
    /// Short rate read from the curve for this call.
    pub short_rate: f64,
    /// Long-run mean after the curve shift adjustment.
    pub effective_theta: f64,
    /// Grid values at the valuation date.
    pub values: Vec<f64>,
    /// One record per applied call obstacle, latest call first.
    pub obstacles: Vec<ObstacleCheck>,
}

/// CIR Crank-Nicolson engine.
#[derive(Debug, Clone, Default)]
pub struct CirPdeEngine {
    config: PdeConfig,
}

impl CirPdeEngine {
    /// Creates an engine with the given grid settings.
    #[must_use]
    pub fn new(config: PdeConfig) -> Self {
        Self { config }
    }

    /// Grid settings.
    pub fn config(&self) -> &PdeConfig {
        &self.config
    }

    /// Solves the PDE and returns the full grid with obstacle records.
    pub fn solve(
        &self,
        curve: &CurveHandle,
        geometry: &BondGeometry,
        params: &CirParams,
        cache: Option<PdeCache>,
    ) -> EngineResult<PdeSolution> {
        params.validate()?;
        self.config.check()?;

        let maturity = geometry.maturity;
        if !(maturity.is_finite() && maturity > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "maturity {maturity} must be positive"
            )));
        }

        let r0 = curve.zero_rate(SHORT_RATE_TENOR)?;
        let cache = match cache {
            Some(c) if c.is_compatible(params, &self.config) => c,
            Some(_) => {
                debug!("PDE cache built for other parameters, starting a new base run");
                PdeCache::new(*params, self.config, r0)
            }
            None => PdeCache::new(*params, self.config, r0),
        };

        let theta = if self.config.shift_theta_with_curve {
            params.long_run_mean + (r0 - cache.r0_base)
        } else {
            params.long_run_mean
        };
        let k = params.speed;
        let sigma = params.volatility;

        let rates = Arc::clone(&cache.rates);
        let m = rates.len();
        let dr = rates[1] - rates[0];

        let nt = ((maturity * f64::from(self.config.steps_per_year)) as usize).max(3);
        let dt = maturity / nt as f64;

        debug!(nodes = m, steps = nt, r0, theta, "CIR PDE pricing");

        let (implicit, explicit) = crank_nicolson_operators(&rates, dr, dt, k, theta, sigma)?;
        let lu = TridiagonalLu::factorize(&implicit)?;

        let coupons: Vec<(f64, f64)> = geometry
            .cashflows
            .iter()
            .filter(|cf| cf.time < maturity)
            .map(|cf| (cf.time, cf.amount))
            .collect();

        let mut values = vec![geometry.redemption + geometry.coupon_amount; m];
        let mut rhs = vec![0.0; m];
        let mut obstacles = Vec::new();

        let mut t = maturity;
        for _ in 0..nt {
            let t_prev = t;
            t -= dt;

            explicit.mul_vec_into(&values, &mut rhs);
            lu.solve_into(&rhs, &mut values);

            for &(ct, amount) in &coupons {
                if t <= ct && ct < t_prev {
                    for v in &mut values {
                        *v += amount;
                    }
                }
            }

            for call in &geometry.calls {
                if t <= call.time && call.time < t_prev {
                    let coupon = coupons
                        .iter()
                        .find(|(ct, _)| (ct - call.time).abs() < 2.0 * dt)
                        .map_or(0.0, |&(_, amount)| amount);
                    let cap = call.price + coupon;
                    let mut max_value = f64::NEG_INFINITY;
                    for v in &mut values {
                        *v = v.min(cap);
                        max_value = max_value.max(*v);
                    }
                    obstacles.push(ObstacleCheck {
                        time: call.time,
                        cap,
                        max_value,
                    });
                }
            }
        }

        let price = interp_clamped(r0, &rates, &values);
        debug!(price, obstacles = obstacles.len(), "CIR PDE done");

        Ok(PdeSolution {
            price: EnginePrice {
                dirty_price: price,
                standard_error: None,
                cache,
            },
            short_rate: r0,
            effective_theta: theta,
            values,
            obstacles,
        })
    }
}

/// Builds `(M_L, M_R)` for one Crank-Nicolson step.
///
/// The implicit operator's first row folds the ghost node below `r_min` into
/// the diagonal by linear extrapolation; the explicit operator drops it.
fn crank_nicolson_operators(
    rates: &[f64],
    dr: f64,
    dt: f64,
    k: f64,
    theta: f64,
    sigma: f64,
) -> EngineResult<(TridiagonalMatrix, TridiagonalMatrix)> {
    let m = rates.len();
    let mut lower = Vec::with_capacity(m);
    let mut diag = Vec::with_capacity(m);
    let mut upper = Vec::with_capacity(m);
    let mut r_lower = Vec::with_capacity(m);
    let mut r_diag = Vec::with_capacity(m);
    let mut r_upper = Vec::with_capacity(m);

    for &r in rates {
        let drift = k * (theta - r);
        let diffusion = 0.5 * sigma * sigma * r;
        let d = diffusion / (dr * dr);
        let c = drift / (2.0 * dr);

        lower.push(-0.25 * dt * (d - c));
        diag.push(1.0 + 0.5 * dt * (r + d));
        upper.push(-0.25 * dt * (d + c));

        r_lower.push(0.25 * dt * (d - c));
        r_diag.push(1.0 - 0.5 * dt * (r + d));
        r_upper.push(0.25 * dt * (d + c));
    }

    diag[0] += 2.0 * lower[0];
    upper[0] -= lower[0];
    lower[0] = 0.0;

    let implicit = TridiagonalMatrix::new(lower[1..].to_vec(), diag, upper[..m - 1].to_vec())?;
    let explicit = TridiagonalMatrix::new(r_lower[1..].to_vec(), r_diag, r_upper[..m - 1].to_vec())?;
    Ok((implicit, explicit))
}

impl CallableEngine for CirPdeEngine {
    type Params = CirParams;
    type Cache = PdeCache;

    fn name(&self) -> &'static str {
        "CIR PDE"
    }

    fn price(
        &self,
        curve: &CurveHandle,
        geometry: &BondGeometry,
        params: &CirParams,
        cache: Option<PdeCache>,
    ) -> EngineResult<EnginePrice<PdeCache>> {
        self.solve(curve, geometry, params, cache).map(|s| s.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use callable_bonds::{CallEvent, Cashflow};
    use callable_core::types::Date;

    fn date() -> Date {
        Date::from_ymd(2030, 1, 1).unwrap()
    }

    fn zero_coupon(maturity: f64) -> BondGeometry {
        BondGeometry {
            maturity,
            coupon_amount: 0.0,
            redemption: 100.0,
            cashflows: vec![Cashflow {
                date: date(),
                time: maturity,
                amount: 100.0,
            }],
            calls: vec![],
        }
    }

    /// Closed-form CIR zero-coupon bond.
    fn cir_zero(r0: f64, theta: f64, k: f64, sigma: f64, t: f64) -> f64 {
        let h = (k * k + 2.0 * sigma * sigma).sqrt();
        let e = (h * t).exp() - 1.0;
        let denom = (h + k) * e + 2.0 * h;
        let b = 2.0 * e / denom;
        let a = (2.0 * h * ((h + k) * t / 2.0).exp() / denom).powf(2.0 * k * theta / (sigma * sigma));
        a * (-b * r0).exp()
    }

    #[test]
    fn test_zero_coupon_matches_closed_form() {
        let params = CirParams::new(0.04, 0.3, 0.05);
        let curve = CurveHandle::flat(0.04).unwrap();
        let out = CirPdeEngine::default()
            .solve(&curve, &zero_coupon(5.0), &params, None)
            .unwrap();
        let expected = 100.0 * cir_zero(0.04, 0.04, 0.3, 0.05, 5.0);
        assert_relative_eq!(out.price.dirty_price, expected, max_relative = 2e-3);
        assert_relative_eq!(out.short_rate, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_theta_follows_curve_shift() {
        let params = CirParams::new(0.04, 0.3, 0.05);
        let engine = CirPdeEngine::default();
        let geometry = zero_coupon(3.0);
        let base = engine
            .solve(&CurveHandle::flat(0.04).unwrap(), &geometry, &params, None)
            .unwrap();
        assert_relative_eq!(base.effective_theta, 0.04, epsilon = 1e-12);

        let bumped = engine
            .solve(
                &CurveHandle::flat(0.04).unwrap().with_parallel_spread(0.001),
                &geometry,
                &params,
                Some(base.price.cache),
            )
            .unwrap();
        assert_relative_eq!(bumped.effective_theta, 0.041, epsilon = 1e-12);
        assert_relative_eq!(bumped.price.cache.r0_base(), 0.04, epsilon = 1e-12);
        assert!(bumped.price.dirty_price < base.price.dirty_price);
    }

    #[test]
    fn test_obstacle_caps_grid() {
        let mut geometry = zero_coupon(6.0);
        geometry.calls.push(CallEvent {
            date: date(),
            time: 2.0,
            price: 85.0,
        });
        let out = CirPdeEngine::default()
            .solve(
                &CurveHandle::flat(0.02).unwrap(),
                &geometry,
                &CirParams::new(0.02, 0.3, 0.05),
                None,
            )
            .unwrap();
        assert_eq!(out.obstacles.len(), 1);
        let check = out.obstacles[0];
        assert_relative_eq!(check.cap, 85.0);
        assert!(check.max_value <= check.cap);
        assert!(out.price.dirty_price <= 85.0);
    }

    #[test]
    fn test_operators_shape() {
        let rates: Vec<f64> = (0..5).map(|i| 0.01 * f64::from(i) + 0.01).collect();
        let (implicit, explicit) = crank_nicolson_operators(&rates, 0.01, 0.01, 0.2, 0.03, 0.1).unwrap();
        assert_eq!(implicit.size(), 5);
        assert_eq!(explicit.lower().len(), 4);
        // Explicit and implicit halves sum to the identity off the boundary row.
        for i in 1..5 {
            assert_relative_eq!(implicit.diag()[i] + explicit.diag()[i], 2.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_rejects_negative_speed() {
        let err = CirPdeEngine::default()
            .price(
                &CurveHandle::flat(0.04).unwrap(),
                &zero_coupon(1.0),
                &CirParams::new(0.04, -1.0, 0.05),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "k", .. }));
    }
}
