//! Least-squares regression on the basis `[1, x, x²]`.
//!
//! The regressor is standardized before forming the normal equations so the
//! Gram matrix stays well conditioned when `x` lives on a small scale (short
//! rate deviations are of order 1e-2).

use nalgebra::{Matrix3, Vector3};

use crate::error::{MathError, MathResult};

/// A fitted quadratic `y ≈ β₀ + β₁x + β₂x²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFit {
    shift: f64,
    scale: f64,
    normalized: [f64; 3],
}

impl QuadraticFit {
    /// Evaluates the fitted polynomial at `x`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let z = (x - self.shift) / self.scale;
        self.normalized[0] + z * (self.normalized[1] + z * self.normalized[2])
    }

    /// Coefficients `[β₀, β₁, β₂]` in the raw basis `[1, x, x²]`.
    #[must_use]
    pub fn coefficients(&self) -> [f64; 3] {
        let [c0, c1, c2] = self.normalized;
        let m = self.shift;
        let s = self.scale;
        [
            c0 - c1 * m / s + c2 * m * m / (s * s),
            c1 / s - 2.0 * c2 * m / (s * s),
            c2 / (s * s),
        ]
    }
}

/// Fits `y` on `[1, x, x²]` by ordinary least squares.
///
/// Fails with [`MathError::InsufficientData`] for fewer than three points and
/// [`MathError::SingularMatrix`] when the regressor has no spread.
pub fn quadratic_least_squares(x: &[f64], y: &[f64]) -> MathResult<QuadraticFit> {
    if x.len() != y.len() {
        return Err(MathError::invalid_input(format!(
            "regressor has {} points but response has {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 3 {
        return Err(MathError::InsufficientData {
            required: 3,
            actual: x.len(),
        });
    }

    let n = x.len() as f64;
    let shift = x.iter().sum::<f64>() / n;
    let scale = (x.iter().map(|v| (v - shift).powi(2)).sum::<f64>() / n).sqrt();
    if !scale.is_finite() || scale <= f64::EPSILON * shift.abs().max(1.0) {
        return Err(MathError::SingularMatrix);
    }

    let mut s1 = 0.0_f64;
    let mut s_z = 0.0_f64;
    let mut s_z2 = 0.0_f64;
    let mut s_z3 = 0.0_f64;
    let mut s_z4 = 0.0_f64;
    let mut s_y = 0.0_f64;
    let mut s_zy = 0.0_f64;
    let mut s_z2y = 0.0_f64;

    for (&xi, &yi) in x.iter().zip(y) {
        let z = (xi - shift) / scale;
        let z2 = z * z;
        s1 += 1.0;
        s_z += z;
        s_z2 += z2;
        s_z3 += z2 * z;
        s_z4 += z2 * z2;
        s_y += yi;
        s_zy += z * yi;
        s_z2y += z2 * yi;
    }

    let xtx = Matrix3::new(s1, s_z, s_z2, s_z, s_z2, s_z3, s_z2, s_z3, s_z4);
    let xty = Vector3::new(s_y, s_zy, s_z2y);
    let beta = xtx.lu().solve(&xty).ok_or(MathError::SingularMatrix)?;

    if beta.iter().any(|b| !b.is_finite()) {
        return Err(MathError::SingularMatrix);
    }

    Ok(QuadraticFit {
        shift,
        scale,
        normalized: [beta[0], beta[1], beta[2]],
    })
}
