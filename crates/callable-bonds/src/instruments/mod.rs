//! Bond instrument definitions.

mod callable;

pub use callable::{CallEntry, CallableBondSpec, CallableBondSpecBuilder};
