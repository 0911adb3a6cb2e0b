//! Deterministic parameter search for the ARMA coefficients.
//!
//! We minimise the conditional sum of squares with a grid search:
//!
//! 1. a coarse uniform grid over the admissible box `(-BOUND, BOUND)^k`,
//!    plus the Hannan–Rissanen regression estimate when it is available
//! 2. a fixed number of refinement grids centred on the incumbent, each
//!    `REFINE_SHRINK` times narrower than the last
//!
//! Grid search keeps the result reproducible for the same input, and with one
//! or two coefficients the coarse pass is cheap enough to cover the whole box.

use crate::error::AppError;
use crate::math::{lagged_design, solve_least_squares};

/// Per-coefficient bound. Keeps AR(1) stationary and MA(1) invertible.
pub const PARAM_BOUND: f64 = 0.98;
/// Coarse grid points per coefficient.
pub const COARSE_STEPS: usize = 41;
/// Refinement grid points per coefficient.
pub const REFINE_STEPS: usize = 11;
pub const REFINE_ROUNDS: usize = 6;
pub const REFINE_SHRINK: f64 = 4.0;
/// Largest `p + q` the search accepts.
pub const MAX_COEFFS: usize = 3;

/// A scored coefficient vector: `[ar_1..ar_p, ma_1..ma_q]`.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub params: Vec<f64>,
    pub sse: f64,
}

/// Where the winning coefficients came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrigin {
    CoarseGrid,
    HannanRissanen,
    Refined,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best: Candidate,
    pub origin: SearchOrigin,
    pub evaluations: usize,
}

/// Conditional sum of squares for ARMA(p, q) without a constant.
///
/// Pre-sample innovations are zero and the first `p` observations only
/// condition the recursion. Innovations are written into `residuals`.
pub fn css(w: &[f64], ar: &[f64], ma: &[f64], residuals: &mut Vec<f64>) -> f64 {
    let p = ar.len();
    residuals.clear();
    residuals.resize(w.len(), 0.0);

    let mut sse = 0.0;
    for t in p..w.len() {
        let mut pred = 0.0;
        for (j, a) in ar.iter().enumerate() {
            pred += a * w[t - j - 1];
        }
        for (j, b) in ma.iter().enumerate() {
            if t > j {
                pred += b * residuals[t - j - 1];
            }
        }
        let e = w[t] - pred;
        residuals[t] = e;
        sse += e * e;
    }
    sse
}

/// Minimise the CSS of ARMA(p, q) on the (already differenced) series `w`.
pub fn search_arma(w: &[f64], p: usize, q: usize) -> Result<SearchResult, AppError> {
    let k = p + q;
    if k > MAX_COEFFS {
        return Err(AppError::config(format!(
            "ARMA search supports at most {MAX_COEFFS} coefficients (p + q = {k})."
        )));
    }

    let mut scratch = Vec::with_capacity(w.len());
    let mut evaluations = 0usize;
    let mut score = |params: &[f64]| -> f64 {
        evaluations += 1;
        css(w, &params[..p], &params[p..], &mut scratch)
    };

    // The regression seed goes first so it wins ties against the grid.
    let mut seeds: Vec<(Vec<f64>, SearchOrigin)> = Vec::new();
    if let Some(hr) = hannan_rissanen(w, p, q) {
        seeds.push((hr, SearchOrigin::HannanRissanen));
    }
    let coarse_axis = linspace(-PARAM_BOUND, PARAM_BOUND, COARSE_STEPS);
    for params in cartesian(&vec![coarse_axis; k]) {
        seeds.push((params, SearchOrigin::CoarseGrid));
    }

    let mut best: Option<(Candidate, SearchOrigin)> = None;
    for (params, origin) in seeds {
        let sse = score(&params);
        if !sse.is_finite() {
            continue;
        }
        let better = match &best {
            None => true,
            Some((b, _)) => sse < b.sse,
        };
        if better {
            best = Some((Candidate { params, sse }, origin));
        }
    }

    let Some((mut incumbent, mut origin)) = best else {
        return Err(AppError::model_fit(
            "No finite CSS candidate; the series is numerically unusable.",
        ));
    };

    let mut half_width = 2.0 * PARAM_BOUND / (COARSE_STEPS as f64 - 1.0);
    for _ in 0..REFINE_ROUNDS {
        if k == 0 {
            break;
        }
        let axes: Vec<Vec<f64>> = incumbent
            .params
            .iter()
            .map(|&c| {
                let lo = (c - half_width).max(-PARAM_BOUND);
                let hi = (c + half_width).min(PARAM_BOUND);
                linspace(lo, hi, REFINE_STEPS)
            })
            .collect();

        for params in cartesian(&axes) {
            let sse = score(&params);
            if sse.is_finite() && sse < incumbent.sse {
                incumbent = Candidate { params, sse };
                origin = SearchOrigin::Refined;
            }
        }
        half_width /= REFINE_SHRINK;
    }

    Ok(SearchResult {
        best: incumbent,
        origin,
        evaluations,
    })
}

/// Hannan–Rissanen two-step regression estimate of ARMA(p, q) coefficients.
///
/// Returns `None` when the series is too short for both regressions or the
/// design is singular. The estimate is clamped into the admissible box.
pub fn hannan_rissanen(w: &[f64], p: usize, q: usize) -> Option<Vec<f64>> {
    let m = w.len();
    if p + q == 0 {
        return None;
    }

    let (coeffs, design) = if q == 0 {
        let (x, y) = lagged_design(w, p, &[], 0, p)?;
        (solve_least_squares(&x, &y)?, x)
    } else {
        // Step 1: long autoregression for the innovations.
        let long = long_ar_order(m, p, q);
        let (x, y) = lagged_design(w, long, &[], 0, long)?;
        if x.nrows() <= x.ncols() {
            return None;
        }
        let phi = solve_least_squares(&x, &y)?;

        let mut innovations = vec![0.0; m];
        for t in long..m {
            let pred: f64 = (0..long).map(|j| phi[j] * w[t - j - 1]).sum();
            innovations[t] = w[t] - pred;
        }

        // Step 2: regress on own lags and lagged innovations.
        let start = (long + q).max(p);
        let (x, y) = lagged_design(w, p, &innovations, q, start)?;
        (solve_least_squares(&x, &y)?, x)
    };

    if design.nrows() <= design.ncols() {
        return None;
    }

    Some(coeffs.iter().map(|c| c.clamp(-PARAM_BOUND, PARAM_BOUND)).collect())
}

fn long_ar_order(m: usize, p: usize, q: usize) -> usize {
    let by_length = (m as f64).ln().ceil() as usize;
    by_length.max(p + q).max(1)
}

/// `steps` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, steps: usize) -> Vec<f64> {
    if steps < 2 || hi <= lo {
        return vec![(lo + hi) / 2.0];
    }
    let step = (hi - lo) / (steps as f64 - 1.0);
    (0..steps).map(|i| lo + step * i as f64).collect()
}

/// Every combination taking one value per axis, in lexicographic order.
pub fn cartesian(axes: &[Vec<f64>]) -> Vec<Vec<f64>> {
    axes.iter().fold(vec![Vec::new()], |acc, axis| {
        acc.iter()
            .flat_map(|prefix| {
                axis.iter().map(move |&v| {
                    let mut next = prefix.clone();
                    next.push(v);
                    next
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(-1.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert!((v[0] + 1.0).abs() < 1e-12);
        assert!((v[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cartesian_covers_all_pairs() {
        let grid = cartesian(&[vec![1.0, 2.0], vec![3.0, 4.0, 5.0]]);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], vec![1.0, 3.0]);
        assert_eq!(grid[5], vec![2.0, 5.0]);
        assert_eq!(cartesian(&[]), vec![Vec::<f64>::new()]);
    }

    #[test]
    fn css_matches_hand_computation() {
        // ARMA(1,1) with ar=0.5, ma=0.2 on [1, 2, 3]:
        // e1 = 2 - 0.5*1 - 0.2*0 = 1.5
        // e2 = 3 - 0.5*2 - 0.2*1.5 = 1.7
        let mut res = Vec::new();
        let sse = css(&[1.0, 2.0, 3.0], &[0.5], &[0.2], &mut res);
        assert!((res[1] - 1.5).abs() < 1e-12);
        assert!((res[2] - 1.7).abs() < 1e-12);
        assert!((sse - (1.5f64.powi(2) + 1.7f64.powi(2))).abs() < 1e-12);
    }

    #[test]
    fn search_recovers_exact_ar1() {
        let mut w = vec![1.0];
        for _ in 0..30 {
            let last = *w.last().unwrap();
            w.push(0.7 * last);
        }
        let result = search_arma(&w, 1, 0).unwrap();
        assert!(
            (result.best.params[0] - 0.7).abs() < 0.05,
            "{:?}",
            result.best.params
        );
    }

    #[test]
    fn ties_never_replace_the_incumbent() {
        // Every AR coefficient scores zero on a flat series.
        let result = search_arma(&[0.0; 20], 1, 0).unwrap();
        assert_eq!(result.best.sse, 0.0);
        assert_ne!(result.origin, SearchOrigin::Refined);
    }

    #[test]
    fn too_many_coefficients_rejected() {
        assert!(search_arma(&[0.0; 50], 2, 2).is_err());
    }

    #[test]
    fn hannan_rissanen_needs_data() {
        assert!(hannan_rissanen(&[1.0, 2.0], 1, 1).is_none());
        assert!(hannan_rissanen(&[1.0, 2.0, 3.0], 0, 0).is_none());
    }
}
