//! Least squares solver.
//!
//! The Hannan–Rissanen seed for the ARMA search needs two small regressions:
//! a long autoregression to estimate the innovations, then a regression of the
//! differenced series on its own lags and the lagged innovations.
//!
//! Implementation choices:
//! - SVD, so tall design matrices (more rows than columns) solve without panics.
//!   (Nalgebra's `QR::solve` is intended for square systems.)
//! - Short monthly series make the design near-singular fairly often, so the
//!   singular-value cutoff is relaxed step by step before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve `min ||x β - y||²` using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.nrows() < x.ncols() || x.ncols() == 0 {
        return None;
    }

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

/// Build the lagged design used by autoregressions.
///
/// Row `t` (for `t` in `start..series.len()`) holds `series[t-1], ..., series[t-lags]`
/// followed by `extra[t-1], ..., extra[t-extra_lags]`; the target is `series[t]`.
pub fn lagged_design(
    series: &[f64],
    lags: usize,
    extra: &[f64],
    extra_lags: usize,
    start: usize,
) -> Option<(DMatrix<f64>, DVector<f64>)> {
    let n = series.len();
    if start < lags.max(extra_lags) || start >= n || (extra_lags > 0 && extra.len() < n) {
        return None;
    }

    let rows = n - start;
    let cols = lags + extra_lags;
    let mut x = DMatrix::<f64>::zeros(rows, cols);
    let mut y = DVector::<f64>::zeros(rows);

    for (r, t) in (start..n).enumerate() {
        for j in 0..lags {
            x[(r, j)] = series[t - j - 1];
        }
        for j in 0..extra_lags {
            x[(r, lags + j)] = extra[t - j - 1];
        }
        y[r] = series[t];
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_rejects_wide_systems() {
        let x = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }

    #[test]
    fn lagged_design_recovers_ar1_coefficient() {
        // x_t = 0.5 x_{t-1}, exactly.
        let mut series = vec![8.0];
        for _ in 0..6 {
            let last = *series.last().unwrap();
            series.push(0.5 * last);
        }
        let (x, y) = lagged_design(&series, 1, &[], 0, 1).unwrap();
        assert_eq!(x.nrows(), 6);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn lagged_design_appends_extra_lags() {
        let series = [1.0, 2.0, 3.0, 4.0];
        let extra = [10.0, 20.0, 30.0, 40.0];
        let (x, y) = lagged_design(&series, 1, &extra, 1, 2).unwrap();
        assert_eq!(x.nrows(), 2);
        assert_eq!(x[(0, 0)], 2.0);
        assert_eq!(x[(0, 1)], 20.0);
        assert_eq!(y[1], 4.0);
    }
}
