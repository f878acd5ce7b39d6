//! Augmented Dickey-Fuller stationarity test
//!
//! Tests for a unit root in a series. H0: the series has a unit root
//! (non-stationary); a small p-value rejects H0. The differencing-order
//! selection in the forecasting pipeline treats `p <= 0.05` as stationary.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};

/// Minimum observations for a meaningful ADF regression.
pub const MIN_OBSERVATIONS: usize = 20;

/// Significance threshold used by [`AdfResult::is_stationary`].
pub const STATIONARY_P_VALUE: f64 = 0.05;

/// Outcome of an ADF test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-statistic of the lagged-level coefficient.
    pub statistic: f64,
    /// Approximate p-value, rounded to 3 decimals.
    pub p_value: f64,
    /// Number of lagged difference terms included.
    pub lags: usize,
}

impl AdfResult {
    pub fn is_stationary(&self) -> bool {
        self.p_value <= STATIONARY_P_VALUE
    }
}

/// Run the ADF test with a constant term and automatic lag selection.
///
/// Lag count follows the usual `2 * n^(1/3)` rule, clamped so the
/// regression keeps enough degrees of freedom.
pub fn adf_test(data: &[f64]) -> Result<AdfResult> {
    let n = data.len();
    if n < MIN_OBSERVATIONS {
        return Err(MathError::InsufficientData(format!(
            "ADF test needs at least {} observations, have {}",
            MIN_OBSERVATIONS, n
        )));
    }

    let diff: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    let lag = ((n as f64).powf(1.0 / 3.0) * 2.0) as usize;
    let lag = lag.min(n / 4).max(1);

    // Regression: dy_t = a + b * y_{t-1} + sum_i g_i * dy_{t-i} + e_t
    let num_regressors = 2 + lag;
    let effective_n = diff.len() - lag;
    if effective_n < num_regressors + 1 {
        return Err(MathError::InsufficientData(format!(
            "ADF regression has {} rows for {} coefficients",
            effective_n, num_regressors
        )));
    }

    let y: Vec<f64> = diff[lag..].to_vec();

    let mut x_data = Vec::with_capacity(effective_n * num_regressors);
    for t in lag..diff.len() {
        x_data.push(1.0);
        x_data.push(data[t]);
        for i in 1..=lag {
            x_data.push(diff[t - i]);
        }
    }

    let x = DMatrix::from_row_slice(effective_n, num_regressors, &x_data);
    let y_vec = DVector::from_vec(y);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y_vec;

    let xtx_inv = xtx.try_inverse().ok_or_else(|| {
        MathError::CalculationError(
            "ADF design matrix is singular, cannot invert normal equations".to_string(),
        )
    })?;
    let beta = &xtx_inv * xty;

    let y_hat = &x * &beta;
    let residuals = &y_vec - y_hat;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let dof = effective_n - num_regressors;
    let mse = sse / dof as f64;

    let se_beta = (mse * xtx_inv[(1, 1)]).sqrt();
    if se_beta == 0.0 || !se_beta.is_finite() {
        return Err(MathError::CalculationError(
            "Standard error of the unit-root coefficient is degenerate".to_string(),
        ));
    }

    let t_stat = beta[1] / se_beta;
    let p_value = (approximate_p_value(t_stat, n) * 1000.0).round() / 1000.0;

    Ok(AdfResult {
        statistic: t_stat,
        p_value,
        lags: lag,
    })
}

/// Approximate p-value by interpolating over finite-sample critical values
/// (constant-only case). Exact values would need the MacKinnon surfaces;
/// this piecewise interpolation is accurate enough for threshold decisions.
fn approximate_p_value(t_stat: f64, n: usize) -> f64 {
    let cv_1 = -3.43 - 6.0 / n as f64;
    let cv_5 = -2.86 - 4.0 / n as f64;
    let cv_10 = -2.57 - 3.0 / n as f64;

    if t_stat < cv_1 {
        0.01 * (cv_1 - t_stat).exp().recip()
    } else if t_stat < cv_5 {
        0.01 + (0.05 - 0.01) * (t_stat - cv_1) / (cv_5 - cv_1)
    } else if t_stat < cv_10 {
        0.05 + (0.10 - 0.05) * (t_stat - cv_5) / (cv_10 - cv_5)
    } else {
        (0.10 + 0.90 * (1.0 - (-0.5 * (t_stat - cv_10)).exp())).min(1.0)
    }
}
