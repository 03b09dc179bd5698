//! Black-Karasinski trinomial tree with forward calibration.
//!
//! The log short rate sits on a recombining grid `x_j = α_i + j·dx` with
//! `dx = σ√(3·dt)`. Branching is the standard Hull-White trinomial scheme
//! centred on the node nearest the mean-reverted drift. The level `α_i` of
//! each step is solved so the Arrow-Debreu prices `Q` reprice the curve's
//! discount factor one step ahead, then `Q` is rolled forward.

use std::collections::BTreeMap;
use std::sync::Arc;

use callable_bonds::BondGeometry;
use callable_curves::{CurveHandle, YieldCurve};
use callable_math::solvers::{brent, SolverConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TreeConfig;
use crate::engine::{CallableEngine, EnginePrice};
use crate::error::{EngineError, EngineResult};
use crate::params::BlackKarasinskiParams;

/// Widest half-width of the tree, in nodes.
const MAX_HALF_WIDTH: usize = 150;

/// Arrow-Debreu prices at or below this are treated as unreachable nodes.
const REACHABLE: f64 = 1e-16;

/// Level search interval for the calibration root finder.
const ALPHA_BRACKET: (f64, f64) = (-12.0, 12.0);

/// Fallback level at the first step, `ln(5%)`.
fn initial_alpha() -> f64 {
    0.05_f64.ln()
}

/// Branching from one node to `j + k + {1, 0, -1}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Offset of the middle target node.
    pub k: i64,
    /// Up probability.
    pub pu: f64,
    /// Middle probability.
    pub pm: f64,
    /// Down probability.
    pub pd: f64,
}

impl Branch {
    /// Branching for a node whose expected move is `drift` grid steps.
    #[must_use]
    pub fn for_drift(drift: f64) -> Self {
        let k = drift.round();
        let eta = drift - k;
        let pu = 1.0 / 6.0 + 0.5 * (eta * eta + eta);
        let pd = 1.0 / 6.0 + 0.5 * (eta * eta - eta);
        Self {
            k: k as i64,
            pu,
            pm: 1.0 - pu - pd,
            pd,
        }
    }
}

/// Outcome of calibrating one time step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationStep {
    /// The root finder matched the discount factor.
    Solved {
        /// Calibrated level.
        alpha: f64,
        /// Root finder iterations.
        iterations: u32,
    },
    /// No root in the search interval; the previous level was reused.
    Fallback {
        /// Level used instead.
        alpha: f64,
    },
}

impl CalibrationStep {
    /// The level used for the step.
    pub fn alpha(&self) -> f64 {
        match self {
            Self::Solved { alpha, .. } | Self::Fallback { alpha } => *alpha,
        }
    }
}

/// Tree geometry and branching, fixed for a parameter set.
#[derive(Debug, Clone)]
pub struct TreeCache {
    params: BlackKarasinskiParams,
    config: TreeConfig,
    dt: f64,
    dx: f64,
    steps: usize,
    j_max: usize,
    branches: Arc<Vec<Branch>>,
}

impl TreeCache {
    fn new(params: BlackKarasinskiParams, config: TreeConfig, maturity: f64) -> Self {
        let a = params.mean_reversion;
        let dt = 1.0 / f64::from(config.steps_per_year);
        let dx = params.volatility * (3.0 * dt).sqrt();
        let steps = Self::steps_for(maturity, dt);
        let j_max = if a > 1e-12 {
            ((6.0 / (a * dt)) as usize + 1).min(MAX_HALF_WIDTH)
        } else {
            MAX_HALF_WIDTH
        };

        let branches = (0..=2 * j_max)
            .map(|j| {
                let offset = j as f64 - j_max as f64;
                Branch::for_drift(-a * offset * dt)
            })
            .collect();

        Self {
            params,
            config,
            dt,
            dx,
            steps,
            j_max,
            branches: Arc::new(branches),
        }
    }

    fn steps_for(maturity: f64, dt: f64) -> usize {
        (maturity / dt) as usize + 2
    }

    fn is_compatible(
        &self,
        params: &BlackKarasinskiParams,
        config: &TreeConfig,
        maturity: f64,
    ) -> bool {
        self.params == *params
            && self.config == *config
            && self.steps == Self::steps_for(maturity, self.dt)
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Log-rate spacing.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Number of time levels.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Half-width; nodes run over `0..=2·j_max` with the centre at `j_max`.
    pub fn j_max(&self) -> usize {
        self.j_max
    }

    /// Branching per node index.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }
}

/// Everything a tree solve produces.
#[derive(Debug, Clone)]
pub struct TreeSolution {
    /// Price and cache.
    pub price: EnginePrice<TreeCache>,
    /// Calibration outcome per step.
    pub calibration: Vec<CalibrationStep>,
}

impl TreeSolution {
    /// Number of steps that fell back to the previous level.
    pub fn fallback_count(&self) -> usize {
        self.calibration
            .iter()
            .filter(|s| matches!(s, CalibrationStep::Fallback { .. }))
            .count()
    }
}

/// Black-Karasinski tree engine.
#[derive(Debug, Clone, Default)]
pub struct BlackKarasinskiTreeEngine {
    config: TreeConfig,
    solver: SolverConfig,
}

impl BlackKarasinskiTreeEngine {
    /// Creates an engine with the given tree settings.
    #[must_use]
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            solver: SolverConfig::default(),
        }
    }

    /// Tree settings.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Builds, calibrates and rolls back the tree.
    pub fn solve(
        &self,
        curve: &CurveHandle,
        geometry: &BondGeometry,
        params: &BlackKarasinskiParams,
        cache: Option<TreeCache>,
    ) -> EngineResult<TreeSolution> {
        params.validate()?;
        self.config.check()?;

        let maturity = geometry.maturity;
        if !(maturity.is_finite() && maturity > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "maturity {maturity} must be positive"
            )));
        }

        let cache = match cache {
            Some(c) if c.is_compatible(params, &self.config, maturity) => c,
            Some(_) => {
                debug!("tree cache built for other parameters, rebuilding geometry");
                TreeCache::new(*params, self.config, maturity)
            }
            None => TreeCache::new(*params, self.config, maturity),
        };

        debug!(
            steps = cache.steps,
            j_max = cache.j_max,
            dx = cache.dx,
            "Black-Karasinski tree pricing"
        );

        let calibration = self.calibrate(curve, &cache)?;
        let alphas: Vec<f64> = calibration.iter().map(CalibrationStep::alpha).collect();
        let price = roll_back(geometry, &cache, &alphas);

        debug!(price, "Black-Karasinski tree done");

        Ok(TreeSolution {
            price: EnginePrice {
                dirty_price: price,
                standard_error: None,
                cache,
            },
            calibration,
        })
    }

    /// Solves `α_i` step by step so the tree reprices `DF((i+1)·dt)`.
    fn calibrate(&self, curve: &CurveHandle, tree: &TreeCache) -> EngineResult<Vec<CalibrationStep>> {
        let TreeCache {
            dt, dx, steps, j_max, ..
        } = *tree;
        let width = 2 * j_max + 1;
        let offsets: Vec<f64> = (0..width).map(|j| (j as f64 - j_max as f64) * dx).collect();
        let one_step = |alpha: f64, j: usize| (-(alpha + offsets[j]).exp() * dt).exp();

        let mut q = vec![0.0; width];
        q[j_max] = 1.0;
        let mut steps_out = Vec::with_capacity(steps - 1);

        for i in 0..steps - 1 {
            let active: Vec<usize> = (0..width).filter(|&j| q[j] > REACHABLE).collect();
            if active.is_empty() {
                break;
            }

            let target = curve.discount_factor((i + 1) as f64 * dt)?;
            let objective =
                |alpha: f64| active.iter().map(|&j| q[j] * one_step(alpha, j)).sum::<f64>() - target;

            let step = match brent(objective, ALPHA_BRACKET.0, ALPHA_BRACKET.1, &self.solver) {
                Ok(result) => CalibrationStep::Solved {
                    alpha: result.root,
                    iterations: result.iterations,
                },
                Err(err) => {
                    let alpha = steps_out
                        .last()
                        .map_or_else(initial_alpha, CalibrationStep::alpha);
                    warn!(step = i, error = %err, alpha, "tree calibration fell back to previous level");
                    CalibrationStep::Fallback { alpha }
                }
            };

            let alpha = step.alpha();
            let mut next = vec![0.0; width];
            for &j in &active {
                let w = q[j] * one_step(alpha, j);
                let b = tree.branches[j];
                let mid = j as i64 + b.k;
                for (target, p) in [(mid, b.pm), (mid + 1, b.pu), (mid - 1, b.pd)] {
                    if (0..width as i64).contains(&target) {
                        next[target as usize] += w * p;
                    }
                }
            }
            q = next;
            steps_out.push(step);
        }

        Ok(steps_out)
    }
}

/// Backward induction over the calibrated tree. Edge nodes carry zero value.
fn roll_back(geometry: &BondGeometry, tree: &TreeCache, alphas: &[f64]) -> f64 {
    let TreeCache {
        dt, dx, steps, j_max, ..
    } = *tree;
    let width = 2 * j_max + 1;
    let top = 2 * j_max as i64;
    let index = |t: f64| (t / dt).round() as usize;

    let mut cashflows: BTreeMap<usize, f64> = BTreeMap::new();
    for cf in &geometry.cashflows {
        *cashflows.entry(index(cf.time)).or_insert(0.0) += cf.amount;
    }
    let calls: BTreeMap<usize, f64> = geometry
        .calls
        .iter()
        .map(|c| (index(c.time), c.price))
        .collect();

    let mut values = vec![cashflows.get(&(steps - 1)).copied().unwrap_or(0.0); width];
    let mut next = vec![0.0; width];

    for i in (0..steps - 1).rev() {
        // Levels past the last calibrated step keep a zero shift.
        let alpha = alphas.get(i).copied().unwrap_or(0.0);
        let coupon = cashflows.get(&i).copied().unwrap_or(0.0);
        let cap = calls.get(&i).map(|price| price + coupon);

        next.iter_mut().for_each(|v| *v = 0.0);
        for j in 1..width - 1 {
            let b = tree.branches[j];
            let mid = j as i64 + b.k;
            if mid <= 0 || mid >= top {
                continue;
            }
            let m = mid as usize;
            let expected = b.pu * values[m + 1] + b.pm * values[m] + b.pd * values[m - 1];
            let rate = (alpha + (j as f64 - j_max as f64) * dx).exp();
            let mut value = expected * (-rate * dt).exp() + coupon;
            if let Some(cap) = cap {
                value = value.min(cap);
            }
            next[j] = value;
        }
        std::mem::swap(&mut values, &mut next);
    }

    values[j_max]
}

impl CallableEngine for BlackKarasinskiTreeEngine {
    type Params = BlackKarasinskiParams;
    type Cache = TreeCache;

    fn name(&self) -> &'static str {
        "Black-Karasinski tree"
    }

    fn price(
        &self,
        curve: &CurveHandle,
        geometry: &BondGeometry,
        params: &BlackKarasinskiParams,
        cache: Option<TreeCache>,
    ) -> EngineResult<EnginePrice<TreeCache>> {
        self.solve(curve, geometry, params, cache).map(|s| s.price)
    }
}
