//! Pricing method selection and the matching engine caches.

use callable_engines::{
    BlackKarasinskiParams, CirParams, HullWhiteParams, McCache, PdeCache, TreeCache,
};
use serde::{Deserialize, Serialize};

/// A pricing method together with its model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum PricingMethod {
    /// Discount the cashflows and ignore the call schedule.
    StraightBond,
    /// Hull-White Monte Carlo with Longstaff-Schwartz exercise.
    HullWhiteLsmc(HullWhiteParams),
    /// CIR Crank-Nicolson with the call obstacle.
    CirPde(CirParams),
    /// Black-Karasinski trinomial tree.
    BlackKarasinskiTree(BlackKarasinskiParams),
}

impl PricingMethod {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StraightBond => "straight bond",
            Self::HullWhiteLsmc(_) => "Hull-White LSMC",
            Self::CirPde(_) => "CIR PDE",
            Self::BlackKarasinskiTree(_) => "Black-Karasinski tree",
        }
    }

    /// Same method with the model volatility multiplied by `factor`.
    #[must_use]
    pub fn with_scaled_volatility(&self, factor: f64) -> Self {
        match self {
            Self::StraightBond => Self::StraightBond,
            Self::HullWhiteLsmc(p) => Self::HullWhiteLsmc(p.with_scaled_volatility(factor)),
            Self::CirPde(p) => Self::CirPde(p.with_scaled_volatility(factor)),
            Self::BlackKarasinskiTree(p) => {
                Self::BlackKarasinskiTree(p.with_scaled_volatility(factor))
            }
        }
    }
}

/// State returned by an engine and accepted back on the next call.
#[derive(Debug, Clone)]
pub enum EngineCache {
    /// Random numbers and frozen regressions.
    MonteCarlo(McCache),
    /// Base short rate and grid.
    Pde(PdeCache),
    /// Tree geometry and branching.
    Tree(TreeCache),
}

impl EngineCache {
    /// Kind name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MonteCarlo(_) => "Monte Carlo",
            Self::Pde(_) => "PDE",
            Self::Tree(_) => "tree",
        }
    }

    pub(crate) fn into_monte_carlo(self) -> Result<McCache, Self> {
        match self {
            Self::MonteCarlo(c) => Ok(c),
            other => Err(other),
        }
    }

    pub(crate) fn into_pde(self) -> Result<PdeCache, Self> {
        match self {
            Self::Pde(c) => Ok(c),
            other => Err(other),
        }
    }

    pub(crate) fn into_tree(self) -> Result<TreeCache, Self> {
        match self {
            Self::Tree(c) => Ok(c),
            other => Err(other),
        }
    }

    /// The Monte Carlo cache, if this is one.
    pub fn as_monte_carlo(&self) -> Option<&McCache> {
        match self {
            Self::MonteCarlo(c) => Some(c),
            _ => None,
        }
    }

    /// The tree cache, if this is one.
    pub fn as_tree(&self) -> Option<&TreeCache> {
        match self {
            Self::Tree(c) => Some(c),
            _ => None,
        }
    }

    /// The PDE cache, if this is one.
    pub fn as_pde(&self) -> Option<&PdeCache> {
        match self {
            Self::Pde(c) => Some(c),
            _ => None,
        }
    }
}
