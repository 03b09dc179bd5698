//! Tri-diagonal systems.
//!
//! Crank-Nicolson stepping solves `M_L · v_next = M_R · v` once per time step
//! with the same `M_L`, so the Thomas elimination is split into a
//! [`TridiagonalLu::factorize`] pass done once and a cheap
//! [`TridiagonalLu::solve_into`] pass done per step.

use crate::error::{MathError, MathResult};

const PIVOT_EPSILON: f64 = 1e-15;

/// A square tri-diagonal matrix stored by diagonals.
///
/// ```text
/// | d[0]  u[0]   0    ...      0    |
/// | l[0]  d[1]  u[1]  ...      0    |
/// |  0    l[1]  d[2]  ...      0    |
/// | ...                u[n-2]       |
/// |  0    ...  l[n-2]  d[n-1]       |
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalMatrix {
    lower: Vec<f64>,
    diag: Vec<f64>,
    upper: Vec<f64>,
}

impl TridiagonalMatrix {
    /// Builds a matrix from its sub-diagonal, main diagonal and super-diagonal.
    ///
    /// `lower` and `upper` must have length `diag.len() - 1`.
    pub fn new(lower: Vec<f64>, diag: Vec<f64>, upper: Vec<f64>) -> MathResult<Self> {
        let n = diag.len();
        if n == 0 {
            return Err(MathError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if lower.len() != n - 1 || upper.len() != n - 1 {
            return Err(MathError::invalid_input(
                "Tridiagonal system has inconsistent dimensions",
            ));
        }
        Ok(Self { lower, diag, upper })
    }

    /// Dimension of the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Sub-diagonal entries.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Main diagonal entries.
    #[must_use]
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// Super-diagonal entries.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Computes `out = self · x`.
    pub fn mul_vec_into(&self, x: &[f64], out: &mut [f64]) {
        let n = self.size();
        debug_assert_eq!(x.len(), n);
        debug_assert_eq!(out.len(), n);

        if n == 1 {
            out[0] = self.diag[0] * x[0];
            return;
        }
        out[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            out[i] = self.lower[i - 1] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        out[n - 1] = self.lower[n - 2] * x[n - 2] + self.diag[n - 1] * x[n - 1];
    }

    /// Returns `self · x` as a new vector.
    #[must_use]
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.size()];
        self.mul_vec_into(x, &mut out);
        out
    }
}

/// Thomas-algorithm factorization of a [`TridiagonalMatrix`].
#[derive(Debug, Clone)]
pub struct TridiagonalLu {
    lower: Vec<f64>,
    c_prime: Vec<f64>,
    inv_denom: Vec<f64>,
}

impl TridiagonalLu {
    /// Eliminates the sub-diagonal once.
    ///
    /// Fails with [`MathError::SingularMatrix`] on a vanishing pivot. No
    /// pivoting is performed, so the matrix should be diagonally dominant.
    pub fn factorize(matrix: &TridiagonalMatrix) -> MathResult<Self> {
        let n = matrix.size();
        let mut c_prime = vec![0.0; n];
        let mut inv_denom = vec![0.0; n];

        let mut denom = matrix.diag[0];
        for i in 0..n {
            if i > 0 {
                denom = matrix.diag[i] - matrix.lower[i - 1] * c_prime[i - 1];
            }
            if denom.abs() < PIVOT_EPSILON || !denom.is_finite() {
                return Err(MathError::SingularMatrix);
            }
            inv_denom[i] = 1.0 / denom;
            if i < n - 1 {
                c_prime[i] = matrix.upper[i] * inv_denom[i];
            }
        }

        Ok(Self {
            lower: matrix.lower.clone(),
            c_prime,
            inv_denom,
        })
    }

    /// Dimension of the factorized system.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inv_denom.len()
    }

    /// Solves `A · x = rhs`, writing `x` over `out`.
    pub fn solve_into(&self, rhs: &[f64], out: &mut [f64]) {
        let n = self.size();
        debug_assert_eq!(rhs.len(), n);
        debug_assert_eq!(out.len(), n);

        out[0] = rhs[0] * self.inv_denom[0];
        for i in 1..n {
            out[i] = (rhs[i] - self.lower[i - 1] * out[i - 1]) * self.inv_denom[i];
        }
        for i in (0..n - 1).rev() {
            out[i] -= self.c_prime[i] * out[i + 1];
        }
    }

    /// Solves `A · x = rhs`.
    #[must_use]
    pub fn solve(&self, rhs: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.size()];
        self.solve_into(rhs, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_tridiagonal_simple() {
        let a = vec![1.0, 1.0];
        let b = vec![2.0, 2.0, 2.0];
        let c = vec![1.0, 1.0];
        let d = vec![1.0, 2.0, 3.0];

        let m = TridiagonalMatrix::new(a.clone(), b.clone(), c.clone()).unwrap();
        let x = TridiagonalLu::factorize(&m).unwrap().solve(&d);

        assert_relative_eq!(b[0] * x[0] + c[0] * x[1], d[0], epsilon = 1e-10);
        assert_relative_eq!(a[0] * x[0] + b[1] * x[1] + c[1] * x[2], d[1], epsilon = 1e-10);
        assert_relative_eq!(a[1] * x[1] + b[2] * x[2], d[2], epsilon = 1e-10);
    }

    #[test]
    fn test_factorization_reused_across_rhs() {
        let m = TridiagonalMatrix::new(vec![-1.0; 4], vec![4.0; 5], vec![-1.0; 4]).unwrap();
        let lu = TridiagonalLu::factorize(&m).unwrap();

        for rhs in [[1.0, 0.0, 0.0, 0.0, 1.0], [5.0, -2.0, 3.0, 0.5, 0.0]] {
            let x = lu.solve(&rhs);
            let back = m.mul_vec(&x);
            for (lhs, r) in back.iter().zip(rhs.iter()) {
                assert_relative_eq!(*lhs, *r, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_mul_vec() {
        let m = TridiagonalMatrix::new(vec![1.0, 2.0], vec![3.0, 4.0, 5.0], vec![6.0, 7.0]).unwrap();
        let y = m.mul_vec(&[1.0, 1.0, 1.0]);
        assert_eq!(y, vec![9.0, 12.0, 7.0]);
    }

    #[test]
    fn test_singular() {
        let m = TridiagonalMatrix::new(vec![1.0], vec![1.0, 1.0], vec![1.0]).unwrap();
        assert!(matches!(
            TridiagonalLu::factorize(&m),
            Err(MathError::SingularMatrix)
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(TridiagonalMatrix::new(vec![1.0], vec![1.0, 1.0, 1.0], vec![1.0, 1.0]).is_err());
    }

    proptest! {
        #[test]
        fn prop_diagonally_dominant_solve(
            off in prop::collection::vec(-1.0f64..1.0, 9),
            rhs in prop::collection::vec(-10.0f64..10.0, 10),
        ) {
            let lower = off.clone();
            let upper: Vec<f64> = off.iter().map(|v| -v).collect();
            let m = TridiagonalMatrix::new(lower, vec![3.0; 10], upper).unwrap();
            let x = TridiagonalLu::factorize(&m).unwrap().solve(&rhs);
            let back = m.mul_vec(&x);
            for (lhs, r) in back.iter().zip(rhs.iter()) {
                prop_assert!((lhs - r).abs() < 1e-9);
            }
        }
    }
}
