//! Price sweeps across volatility, rate level and OAS.
//!
//! Each sweep prices every scenario at every grid point with a fresh engine
//! state, so the columns are independent runs and not bump-and-reprice
//! differences.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BPS;
use crate::error::PricerResult;
use crate::method::PricingMethod;
use crate::pricer::CallablePricer;

/// One column of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Column label.
    pub label: String,
    /// Method and parameters to price with.
    pub method: PricingMethod,
}

impl Scenario {
    /// Creates a scenario.
    pub fn new(label: impl Into<String>, method: PricingMethod) -> Self {
        Self {
            label: label.into(),
            method,
        }
    }
}

/// Quantity varied along a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    /// Multiplier applied to the model volatility.
    VolMultiplier,
    /// Parallel shift of the risk-free curve, in basis points.
    RateShiftBps,
    /// OAS, in basis points.
    OasBps,
}

/// Clean prices of every scenario at one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Grid value.
    pub x: f64,
    /// One clean price per scenario, in scenario order.
    pub prices: Vec<f64>,
}

/// A sweep in wide format: one row per grid point, one column per scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepTable {
    /// What `x` measures.
    pub axis: SweepAxis,
    /// Scenario labels.
    pub labels: Vec<String>,
    /// Rows in grid order.
    pub rows: Vec<SweepRow>,
}

impl SweepTable {
    /// Prices of the scenario labelled `label`, in grid order.
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let index = self.labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|r| r.prices[index]).collect())
    }
}

fn sweep<F>(
    axis: SweepAxis,
    scenarios: &[Scenario],
    grid: &[f64],
    mut price: F,
) -> PricerResult<SweepTable>
where
    F: FnMut(&Scenario, f64) -> PricerResult<f64>,
{
    let rows = grid
        .iter()
        .map(|&x| {
            let prices = scenarios
                .iter()
                .map(|s| price(s, x))
                .collect::<PricerResult<Vec<_>>>()?;
            debug!(?axis, x, "sweep point");
            Ok(SweepRow { x, prices })
        })
        .collect::<PricerResult<Vec<_>>>()?;

    Ok(SweepTable {
        axis,
        labels: scenarios.iter().map(|s| s.label.clone()).collect(),
        rows,
    })
}

/// Clean price as the model volatility is scaled by each multiplier.
pub fn price_vs_volatility(
    pricer: &CallablePricer,
    scenarios: &[Scenario],
    oas: f64,
    multipliers: &[f64],
) -> PricerResult<SweepTable> {
    sweep(SweepAxis::VolMultiplier, scenarios, multipliers, |s, m| {
        let method = s.method.with_scaled_volatility(m);
        Ok(pricer.calculate(&method, oas, None)?.clean_price)
    })
}

/// Clean price as the risk-free curve shifts in parallel; OAS applies on top.
pub fn price_vs_rate_shift(
    pricer: &CallablePricer,
    scenarios: &[Scenario],
    oas: f64,
    shifts_bps: &[f64],
) -> PricerResult<SweepTable> {
    sweep(SweepAxis::RateShiftBps, scenarios, shifts_bps, |s, bps| {
        let curve = pricer.curve().with_parallel_spread(bps / BPS);
        Ok(pricer.calculate_on(&curve, &s.method, oas, None)?.clean_price)
    })
}

/// Clean price across an OAS grid.
pub fn price_vs_oas(
    pricer: &CallablePricer,
    scenarios: &[Scenario],
    oas_grid_bps: &[f64],
) -> PricerResult<SweepTable> {
    sweep(SweepAxis::OasBps, scenarios, oas_grid_bps, |s, bps| {
        Ok(pricer.calculate(&s.method, bps / BPS, None)?.clean_price)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use callable_bonds::CallableBondSpec;
    use callable_core::{Date, Frequency};
    use callable_curves::CurveHandle;
    use callable_engines::{BlackKarasinskiParams, TreeConfig};
    use rust_decimal_macros::dec;

    use crate::config::PricerConfig;

    fn pricer() -> CallablePricer {
        let issue = Date::from_ymd(2024, 6, 1).unwrap();
        let bond = CallableBondSpec::builder()
            .face(dec!(100))
            .coupon_rate(dec!(0.045))
            .frequency(Frequency::Annual)
            .issue_date(issue)
            .maturity_date(Date::from_ymd(2030, 6, 1).unwrap())
            .add_call(Date::from_ymd(2027, 6, 1).unwrap(), 100.0)
            .build()
            .unwrap();
        let config = PricerConfig::default().with_tree(TreeConfig { steps_per_year: 12 });
        CallablePricer::new(CurveHandle::flat(0.04).unwrap(), bond, issue, config).unwrap()
    }

    fn scenarios() -> Vec<Scenario> {
        vec![
            Scenario::new("straight", PricingMethod::StraightBond),
            Scenario::new(
                "tree",
                PricingMethod::BlackKarasinskiTree(BlackKarasinskiParams::new(0.1, 0.2)),
            ),
        ]
    }

    #[test]
    fn test_volatility_sweep_shape() {
        let table = price_vs_volatility(&pricer(), &scenarios(), 0.0, &[0.5, 1.0, 2.0]).unwrap();
        assert_eq!(table.axis, SweepAxis::VolMultiplier);
        assert_eq!(table.labels, vec!["straight", "tree"]);
        assert_eq!(table.rows.len(), 3);

        // The straight bond has no volatility.
        let straight = table.column("straight").unwrap();
        assert_relative_eq!(straight[0], straight[2], epsilon = 1e-12);

        // More volatility, more call value, lower callable price.
        let tree = table.column("tree").unwrap();
        assert!(tree[2] < tree[0]);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_rate_shift_matches_oas_for_straight() {
        let p = pricer();
        let grid = [-50.0, 0.0, 50.0];
        let by_shift = price_vs_rate_shift(&p, &scenarios()[..1], 0.0, &grid).unwrap();
        let by_oas = price_vs_oas(&p, &scenarios()[..1], &grid).unwrap();
        for (a, b) in by_shift.rows.iter().zip(&by_oas.rows) {
            assert_relative_eq!(a.prices[0], b.prices[0], max_relative = 1e-12);
        }
        let col = by_shift.column("straight").unwrap();
        assert!(col[0] > col[1] && col[1] > col[2]);
    }

    #[test]
    fn test_table_serializes() {
        let table = price_vs_oas(&pricer(), &scenarios()[..1], &[0.0]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"axis\":\"oas_bps\""));
    }
}
