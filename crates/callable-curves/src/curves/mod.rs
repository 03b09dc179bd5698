//! Concrete curve implementations.

mod discount;
mod flat;

pub use discount::DiscountCurve;
pub use flat::FlatCurve;
