//! ARIMA(p, d, q) estimation and point forecasting.
//!
//! Given a monthly series `y`:
//! - difference it `d` times to `w`
//! - estimate ARMA(p, q) coefficients on `w` (no constant) by minimising the
//!   conditional sum of squares (see `fit::search`)
//! - forecast `w` recursively with future innovations set to zero and
//!   integrate the forecast back onto the scale of `y`

use crate::domain::ArimaOrder;
use crate::error::AppError;
use crate::fit::search::{SearchOrigin, css, search_arma};
use crate::math::{difference, integrate};

/// Goodness-of-fit statistics of the CSS estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct FitQuality {
    pub sse: f64,
    /// Innovation variance, `sse / n_eff`.
    pub sigma2: f64,
    /// Observations contributing to the CSS (differenced length minus `p`).
    pub n_eff: usize,
    pub bic: f64,
}

/// A fitted ARIMA model, ready to forecast.
#[derive(Debug, Clone)]
pub struct ArimaModel {
    pub order: ArimaOrder,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub quality: FitQuality,
    pub origin: SearchOrigin,
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
}

/// Fit `order` to `series`.
///
/// Fails with `InsufficientData` when the series is shorter than
/// `order.min_observations()`, and with `ModelFit` when it contains
/// non-finite values or no finite estimate exists.
pub fn fit_arima(series: &[f64], order: ArimaOrder) -> Result<ArimaModel, AppError> {
    let required = order.min_observations();
    if series.len() < required {
        return Err(AppError::insufficient_data(required, series.len()));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(AppError::model_fit("Series contains non-finite values."));
    }

    let differenced = difference(series, order.d);
    let search = search_arma(&differenced, order.p, order.q)?;
    let (ar, ma) = search.best.params.split_at(order.p);

    let mut residuals = Vec::with_capacity(differenced.len());
    let sse = css(&differenced, ar, ma, &mut residuals);
    if !sse.is_finite() {
        return Err(AppError::model_fit(format!("{order} produced a non-finite sum of squares.")));
    }

    let n_eff = differenced.len() - order.p;
    let sigma2 = sse / n_eff as f64;
    let n_params = (order.n_coeffs() + 1) as f64;
    // A perfect fit (sse = 0) would send the log to -inf.
    let bic = n_eff as f64 * sigma2.max(f64::MIN_POSITIVE).ln() + n_params * (n_eff as f64).ln();

    tracing::debug!(
        %order,
        evaluations = search.evaluations,
        origin = ?search.origin,
        sse,
        "ARMA search finished"
    );

    Ok(ArimaModel {
        order,
        ar: ar.to_vec(),
        ma: ma.to_vec(),
        quality: FitQuality {
            sse,
            sigma2,
            n_eff,
            bic,
        },
        origin: search.origin,
        history: series.to_vec(),
        differenced,
        residuals,
    })
}

impl ArimaModel {
    /// Point forecast for the next `steps` periods on the original scale.
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>, AppError> {
        let m = self.differenced.len();
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();

        for _ in 0..steps {
            let t = w.len();
            let mut pred = 0.0;
            for (j, a) in self.ar.iter().enumerate() {
                if t > j {
                    pred += a * w[t - j - 1];
                }
            }
            for (j, b) in self.ma.iter().enumerate() {
                if t > j {
                    pred += b * e[t - j - 1];
                }
            }
            w.push(pred);
            e.push(0.0);
        }

        let out = integrate(&self.history, &w[m..], self.order.d);
        if out.iter().any(|v| !v.is_finite()) {
            return Err(AppError::model_fit("Forecast produced non-finite values."));
        }
        Ok(out)
    }

    /// The series after differencing.
    pub fn differenced(&self) -> &[f64] {
        &self.differenced
    }

    /// In-sample CSS innovations, aligned with `differenced()`.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }
}
