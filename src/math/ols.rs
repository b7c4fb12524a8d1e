//! Least-squares polynomial fitting.
//!
//! The legacy curve mode fits a low-order polynomial in temperature to each
//! rated quantity. The systems are tiny (a handful of rating points, at most
//! three coefficients), so an SVD solve is both robust and cheap.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = c0 + c1 x + ... + c_d x^d` and return `[c0, c1, ..., c_d]`.
///
/// Returns `None` when there are fewer points than coefficients or the
/// design matrix is singular.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    let n = xs.len();
    let cols = degree + 1;
    if n != ys.len() || n < cols {
        return None;
    }

    let x = DMatrix::from_fn(n, cols, |r, c| xs[r].powi(c as i32));
    let y = DVector::from_column_slice(ys);
    solve_least_squares(&x, &y).map(|beta| beta.iter().copied().collect())
}

/// Evaluate polynomial coefficients (lowest order first) at `x`.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
