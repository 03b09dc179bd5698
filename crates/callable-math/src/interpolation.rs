//! Grid interpolation.

/// Piecewise-linear interpolation of `ys` over the increasing grid `xs`.
///
/// Values outside the grid are clamped to the end points. Returns `NaN` for
/// empty or mismatched input.
#[must_use]
pub fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n == 0 || n != ys.len() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // First index with xs[i] > x; guaranteed in 1..n by the clamps above.
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let w = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + w * (ys[hi] - ys[lo])
}
