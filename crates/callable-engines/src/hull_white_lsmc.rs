//! Hull-White Monte Carlo with Longstaff-Schwartz exercise.
//!
//! The short rate is `r(t) = X(t) + α(t)` where `X` is an Ornstein-Uhlenbeck
//! state started at zero and `α(t) = f(0, t) + Var[X(t)]` aligns the drift
//! with the curve's forwards. Paths are discounted backward one step at a
//! time; at each call date the continuation value is regressed on
//! `[1, X, X²]` across all paths and the issuer calls wherever the fitted
//! continuation (ex-coupon) exceeds the strike.
//!
//! # Common random numbers
//!
//! The normal draws (paths × steps) are generated once from the configured
//! seed and kept in [`McCache`]. The regressions fitted on the base run are
//! frozen in the same cache, so a bumped-curve reprice moves only the
//! discounting along a fixed exercise policy.

use std::collections::BTreeMap;
use std::sync::Arc;

use callable_bonds::BondGeometry;
use callable_core::types::Date;
use callable_curves::{CurveHandle, YieldCurve};
use callable_math::regression::{quadratic_least_squares, QuadraticFit};
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::McConfig;
use crate::engine::{CallableEngine, EnginePrice};
use crate::error::{EngineError, EngineResult};
use crate::params::HullWhiteParams;

/// Width of the forward rate window used to read `f(0, t)`.
const FORWARD_WINDOW: f64 = 0.001;

/// Share of paths exercised at one call date on the base run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProbability {
    /// Call date.
    pub date: Date,
    /// Year fraction of the call date.
    pub time: f64,
    /// Fraction of paths on which the issuer calls.
    pub probability: f64,
}

/// Common random numbers and frozen exercise policy.
#[derive(Debug, Clone)]
pub struct McCache {
    params: HullWhiteParams,
    config: McConfig,
    steps: usize,
    normals: Arc<Array2<f64>>,
    regressions: BTreeMap<usize, QuadraticFit>,
    frozen: bool,
    exercise: Vec<ExerciseProbability>,
}

impl McCache {
    fn new(params: HullWhiteParams, config: McConfig, steps: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let normals =
            Array2::<f64>::from_shape_simple_fn((config.paths, steps), || StandardNormal.sample(&mut rng));
        Self {
            params,
            config,
            steps,
            normals: Arc::new(normals),
            regressions: BTreeMap::new(),
            frozen: false,
            exercise: Vec::new(),
        }
    }

    fn is_compatible(&self, params: &HullWhiteParams, config: &McConfig, steps: usize) -> bool {
        self.params == *params && self.config == *config && self.steps == steps
    }

    /// Parameter set the cache was built for.
    pub fn params(&self) -> &HullWhiteParams {
        &self.params
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The standard normal draws, one row per path.
    pub fn normals(&self) -> &Arc<Array2<f64>> {
        &self.normals
    }

    /// Regressions keyed by call step, fitted on the base run.
    pub fn regressions(&self) -> &BTreeMap<usize, QuadraticFit> {
        &self.regressions
    }

    /// Whether the base run has completed and the policy is fixed.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Exercise frequencies recorded on the base run, by call date.
    pub fn exercise_probabilities(&self) -> &[ExerciseProbability] {
        &self.exercise
    }
}

/// Hull-White Monte Carlo engine.
#[derive(Debug, Clone, Default)]
pub struct HullWhiteLsmcEngine {
    config: McConfig,
}

impl HullWhiteLsmcEngine {
    /// Creates an engine with the given simulation settings.
    #[must_use]
    pub fn new(config: McConfig) -> Self {
        Self { config }
    }

    /// Simulation settings.
    pub fn config(&self) -> &McConfig {
        &self.config
    }
}

fn simulate_path(mut x: ArrayViewMut1<f64>, z: ArrayView1<f64>, decay: f64, vol: f64) {
    for i in 0..z.len() {
        x[i + 1] = x[i] * decay + vol * z[i];
    }
}

/// `Var[X(t)]` of the zero-started OU state.
fn state_variance(a: f64, sigma: f64, t: f64) -> f64 {
    if a.abs() > 1e-5 {
        let g = 1.0 - (-a * t).exp();
        sigma * sigma / (2.0 * a * a) * g * g
    } else {
        0.5 * sigma * sigma * t * t
    }
}

struct CallStep {
    date: Date,
    time: f64,
    strike: f64,
}

impl CallableEngine for HullWhiteLsmcEngine {
    type Params = HullWhiteParams;
    type Cache = McCache;

    fn name(&self) -> &'static str {
        "Hull-White LSMC"
    }

    fn price(
        &self,
        curve: &CurveHandle,
        geometry: &BondGeometry,
        params: &HullWhiteParams,
        cache: Option<McCache>,
    ) -> EngineResult<EnginePrice<McCache>> {
        params.validate()?;
        self.config.check()?;

        let maturity = geometry.maturity;
        if !(maturity.is_finite() && maturity > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "maturity {maturity} must be positive"
            )));
        }

        let a = params.mean_reversion;
        let sigma = params.volatility;
        let n = ((maturity * f64::from(self.config.steps_per_year)) as usize).max(2);
        let dt = maturity / n as f64;

        let mut cache = match cache {
            Some(c) if c.is_compatible(params, &self.config, n) => c,
            Some(_) => {
                debug!("Monte Carlo cache built for other parameters, starting a new base run");
                McCache::new(*params, self.config, n)
            }
            None => McCache::new(*params, self.config, n),
        };
        let base_run = !cache.frozen;
        let paths = self.config.paths;

        debug!(paths, steps = n, base_run, a, sigma, "Hull-White LSMC pricing");

        // OU state, one row per path.
        let mut x = Array2::<f64>::zeros((paths, n + 1));
        let decay = if a.abs() < 1e-12 { 1.0 } else { 1.0 - a * dt };
        let vol = sigma * dt.sqrt();
        let normals = Arc::clone(&cache.normals);

        #[cfg(feature = "parallel")]
        Zip::from(x.rows_mut())
            .and(normals.rows())
            .par_for_each(|row, z| simulate_path(row, z, decay, vol));
        #[cfg(not(feature = "parallel"))]
        Zip::from(x.rows_mut())
            .and(normals.rows())
            .for_each(|row, z| simulate_path(row, z, decay, vol));

        let grid: Vec<f64> = (0..=n).map(|i| maturity * i as f64 / n as f64).collect();
        let alpha = grid
            .iter()
            .map(|&t| {
                let fwd = curve.forward_rate(t, t + FORWARD_WINDOW)?;
                Ok(fwd + state_variance(a, sigma, t))
            })
            .collect::<EngineResult<Vec<f64>>>()?;

        let mut calls: BTreeMap<usize, CallStep> = BTreeMap::new();
        for call in &geometry.calls {
            let step = ((call.time / dt).round() as usize).clamp(1, n);
            calls.insert(
                step,
                CallStep {
                    date: call.date,
                    time: call.time,
                    strike: call.price,
                },
            );
        }

        let mut value = vec![0.0; paths];
        let mut exercise = Vec::new();

        for i in (0..n).rev() {
            for (v, &xi) in value.iter_mut().zip(x.column(i).iter()) {
                *v *= (-(xi + alpha[i]) * dt).exp();
            }

            let coupon = geometry.cashflow_in(grid[i], grid[i + 1]);
            if coupon != 0.0 {
                for v in &mut value {
                    *v += coupon;
                }
            }

            let step = i + 1;
            let Some(call) = calls.get(&step) else {
                continue;
            };

            let state: Vec<f64> = x.column(step).to_vec();
            let fit = if base_run {
                let fit = quadratic_least_squares(&state, &value)
                    .map_err(|source| EngineError::RegressionFailed { step, source })?;
                cache.regressions.insert(step, fit);
                fit
            } else {
                *cache.regressions.get(&step).ok_or_else(|| {
                    EngineError::invalid_config(format!(
                        "cached exercise policy has no regression for call step {step}"
                    ))
                })?
            };

            let mut called = 0_usize;
            for (v, &s) in value.iter_mut().zip(&state) {
                if fit.evaluate(s) - coupon > call.strike {
                    *v = call.strike + coupon;
                    called += 1;
                }
            }

            if base_run {
                exercise.push(ExerciseProbability {
                    date: call.date,
                    time: call.time,
                    probability: called as f64 / paths as f64,
                });
            }
        }

        let count = paths as f64;
        let mean = value.iter().sum::<f64>() / count;
        let variance = value.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let standard_error = (variance / count).sqrt();

        if base_run {
            exercise.reverse();
            cache.exercise = exercise;
            cache.frozen = true;
        }

        debug!(price = mean, standard_error, "Hull-White LSMC done");

        Ok(EnginePrice {
            dirty_price: mean,
            standard_error: Some(standard_error),
            cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use callable_bonds::{CallEvent, Cashflow};

    fn zero_coupon(maturity: f64) -> BondGeometry {
        let date = Date::from_ymd(2035, 1, 1).unwrap();
        BondGeometry {
            maturity,
            coupon_amount: 0.0,
            redemption: 100.0,
            cashflows: vec![Cashflow {
                date,
                time: maturity,
                amount: 100.0,
            }],
            calls: vec![],
        }
    }

    fn engine(paths: usize) -> HullWhiteLsmcEngine {
        HullWhiteLsmcEngine::new(McConfig::default().with_paths(paths))
    }

    #[test]
    fn test_state_variance_limits() {
        let small = state_variance(1e-7, 0.01, 5.0);
        assert_relative_eq!(small, 0.5 * 1e-4 * 25.0);
        let exact = state_variance(0.1, 0.01, 5.0);
        let g = 1.0 - (-0.5_f64).exp();
        assert_relative_eq!(exact, 1e-4 / 0.02 * g * g, epsilon = 1e-15);
    }

    #[test]
    fn test_cache_draws_once() {
        let curve = CurveHandle::flat(0.04).unwrap();
        let geometry = zero_coupon(5.0);
        let params = HullWhiteParams::new(0.05, 0.01);
        let engine = engine(500);

        let first = engine.price(&curve, &geometry, &params, None).unwrap();
        let normals = Arc::clone(first.cache.normals());
        assert_eq!(normals.dim(), (500, 120));
        assert!(first.cache.is_frozen());

        let second = engine
            .price(&curve, &geometry, &params, Some(first.cache))
            .unwrap();
        assert!(Arc::ptr_eq(&normals, second.cache.normals()));
    }

    #[test]
    fn test_seed_selects_ensemble() {
        let curve = CurveHandle::flat(0.04).unwrap();
        let geometry = zero_coupon(3.0);
        let params = HullWhiteParams::new(0.05, 0.01);
        let seeded = |seed| {
            HullWhiteLsmcEngine::new(McConfig::default().with_paths(300).with_seed(seed))
                .price(&curve, &geometry, &params, None)
                .unwrap()
        };

        let a = seeded(7);
        let b = seeded(7);
        let c = seeded(8);
        assert_eq!(a.cache.normals().as_ref(), b.cache.normals().as_ref());
        assert_eq!(a.dirty_price, b.dirty_price);
        assert_ne!(a.cache.normals().as_ref(), c.cache.normals().as_ref());
        assert_ne!(a.dirty_price, c.dirty_price);

        // A cache drawn under another seed is not reused.
        let reseeded = HullWhiteLsmcEngine::new(McConfig::default().with_paths(300).with_seed(8))
            .price(&curve, &geometry, &params, Some(a.cache))
            .unwrap();
        assert_eq!(reseeded.dirty_price, c.dirty_price);
    }

    #[test]
    fn test_zero_coupon_close_to_curve() {
        // α(t) matches the forwards, so the mean discount recovers DF(T).
        let curve = CurveHandle::flat(0.04).unwrap();
        let geometry = zero_coupon(5.0);
        let out = engine(4000)
            .price(&curve, &geometry, &HullWhiteParams::new(0.05, 0.01), None)
            .unwrap();
        let expected = 100.0 * (-0.2_f64).exp();
        let se = out.standard_error.unwrap();
        assert!(se > 0.0);
        assert!((out.dirty_price - expected).abs() < 0.5);
    }

    #[test]
    fn test_mismatched_cache_is_rebuilt() {
        let curve = CurveHandle::flat(0.04).unwrap();
        let geometry = zero_coupon(3.0);
        let engine = engine(200);
        let first = engine
            .price(&curve, &geometry, &HullWhiteParams::new(0.05, 0.01), None)
            .unwrap();
        let other = HullWhiteParams::new(0.05, 0.02);
        let second = engine
            .price(&curve, &geometry, &other, Some(first.cache))
            .unwrap();
        assert_eq!(*second.cache.params(), other);
    }

    #[test]
    fn test_deep_call_is_exercised() {
        // A call far below the bond's value is always exercised.
        let date = Date::from_ymd(2027, 1, 1).unwrap();
        let mut geometry = zero_coupon(4.0);
        geometry.calls.push(CallEvent {
            date,
            time: 2.0,
            price: 50.0,
        });
        let curve = CurveHandle::flat(0.03).unwrap();
        let out = engine(1000)
            .price(&curve, &geometry, &HullWhiteParams::new(0.05, 0.01), None)
            .unwrap();

        let probs = out.cache.exercise_probabilities();
        assert_eq!(probs.len(), 1);
        assert_relative_eq!(probs[0].probability, 1.0);
        assert_eq!(out.cache.regressions().len(), 1);
        assert!(out.cache.regressions().contains_key(&48));
        assert!((out.dirty_price - 50.0 * (-0.06_f64).exp()).abs() < 0.5);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let err = engine(100)
            .price(
                &CurveHandle::flat(0.04).unwrap(),
                &zero_coupon(2.0),
                &HullWhiteParams::new(0.05, 0.0),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { .. }));
    }

    #[test]
    fn test_degenerate_mean_reversion() {
        let out = engine(2000)
            .price(
                &CurveHandle::flat(0.04).unwrap(),
                &zero_coupon(2.0),
                &HullWhiteParams::new(0.0, 0.01),
                None,
            )
            .unwrap();
        assert!((out.dirty_price - 100.0 * (-0.08_f64).exp()).abs() < 0.5);
    }
}
