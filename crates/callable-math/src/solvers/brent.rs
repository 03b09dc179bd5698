//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Brent's method on the bracket `[a, b]`.
///
/// Combines bisection, secant steps and inverse quadratic interpolation.
/// Requires `f(a)` and `f(b)` to have opposite signs (or one of them to be
/// zero); otherwise returns [`MathError::InvalidBracket`] without iterating.
///
/// # Example
///
/// ```rust
/// use callable_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-9);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() || fa * fb > 0.0 {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }
    if fa == 0.0 {
        return Ok(SolverResult {
            root: a,
            iterations: 0,
            residual: 0.0,
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..config.max_iterations {
        if fb * fc > 0.0 {
            // Root lies between a and b: rename so that c is the contrapoint.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant step
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q0 = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q0 * (q0 - r) - (b - a) * (r - 1.0)),
                    (q0 - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}
