//! ARIMA model fitting and forecasting
//!
//! Estimation uses the Hannan-Rissanen two-stage procedure: a long
//! autoregression first produces proxy residuals, then AR and MA
//! coefficients are estimated jointly by least squares against those
//! proxies. The pipeline runs ARIMA(5, d, 5) throughout; the
//! implementation accepts any `p >= 1`, `q >= 0`.

use crate::error::{ForecastError, Result};
use crate::preprocess::{difference, difference_anchors, undifference};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Model order specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaSpec {
    /// Autoregressive order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// Moving-average order
    pub q: usize,
}

impl ArimaSpec {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Minimum number of observations [`fit`] accepts.
    ///
    /// Derived from the estimation procedure: after differencing, the
    /// long-AR stage and the joint regression both need enough rows to
    /// keep the normal equations overdetermined. For ARIMA(5, d, 5) this
    /// works out to `d + 17`.
    ///
    /// [`fit`]: ArimaSpec::fit
    pub fn min_observations(&self) -> usize {
        let floor = self.p.max(self.q) + self.p + self.q + 2;
        let mut n_d = floor.max(4);
        loop {
            let ar_order = long_ar_order(self.p, self.q, n_d);
            let start = ar_order.max(self.p).max(self.q);
            if n_d >= start + self.p + self.q + 2 && ar_order >= 1 {
                return n_d + self.d;
            }
            n_d += 1;
        }
    }

    /// Fit the model to a series on the original (undifferenced) scale.
    pub fn fit(&self, values: &[f64]) -> Result<FittedArima> {
        if self.p == 0 {
            return Err(ForecastError::InvalidParameter(
                "AR order must be at least 1".to_string(),
            ));
        }

        let min = self.min_observations();
        if values.len() < min {
            return Err(ForecastError::InsufficientHistory(format!(
                "ARIMA({},{},{}) needs at least {} observations, have {}",
                self.p,
                self.d,
                self.q,
                min,
                values.len()
            )));
        }

        let working = difference(values, self.d);
        let anchors = difference_anchors(values, self.d);

        let (ar, ma, constant, residuals) = if self.q == 0 {
            estimate_ar(&working, self.p)?
        } else {
            estimate_arma(&working, self.p, self.q)?
        };

        if ar.iter().chain(ma.iter()).any(|c| !c.is_finite()) || !constant.is_finite() {
            return Err(ForecastError::ModelFitFailure(
                "Estimation produced non-finite coefficients".to_string(),
            ));
        }

        debug!(
            p = self.p,
            d = self.d,
            q = self.q,
            n = values.len(),
            "ARIMA fit complete"
        );

        Ok(FittedArima {
            spec: *self,
            ar,
            ma,
            constant,
            residuals,
            working,
            anchors,
        })
    }
}

impl std::fmt::Display for ArimaSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// A fitted ARIMA model, owned by the request that created it.
#[derive(Debug, Clone)]
pub struct FittedArima {
    spec: ArimaSpec,
    ar: Vec<f64>,
    ma: Vec<f64>,
    constant: f64,
    residuals: Vec<f64>,
    /// Training series on the differenced scale
    working: Vec<f64>,
    /// Last value of each differencing level, for integration
    anchors: Vec<f64>,
}

impl FittedArima {
    pub fn spec(&self) -> ArimaSpec {
        self.spec
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Iterated point forecast on the original scale.
    ///
    /// Future shocks are set to their expectation (zero) and the
    /// differencing transform is inverted before returning.
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let mut history = self.working.clone();
        let mut shocks = self.residuals.clone();
        let mut forecasts = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let mut next = self.constant;
            for (i, coeff) in self.ar.iter().enumerate() {
                next += coeff * history[history.len() - 1 - i];
            }
            for (i, coeff) in self.ma.iter().enumerate() {
                if shocks.len() > i {
                    next += coeff * shocks[shocks.len() - 1 - i];
                }
            }

            if !next.is_finite() {
                return Err(ForecastError::ForecastingError(
                    "Forecast recursion diverged to a non-finite value".to_string(),
                ));
            }

            history.push(next);
            shocks.push(0.0);
            forecasts.push(next);
        }

        Ok(undifference(&forecasts, &self.anchors))
    }
}

/// Long-AR order for the first Hannan-Rissanen stage.
fn long_ar_order(p: usize, q: usize, n: usize) -> usize {
    (p + q).max(10).min(n / 4).max(1)
}

/// Pure AR estimation by ordinary least squares.
fn estimate_ar(data: &[f64], p: usize) -> Result<(Vec<f64>, Vec<f64>, f64, Vec<f64>)> {
    let n = data.len();
    let effective_n = n - p;

    let y: Vec<f64> = data[p..].to_vec();

    // Regressors: [1, y_{t-1}, ..., y_{t-p}]
    let mut x_data = Vec::with_capacity(effective_n * (p + 1));
    for t in p..n {
        x_data.push(1.0);
        for i in 1..=p {
            x_data.push(data[t - i]);
        }
    }

    let (beta, residuals) = solve_ols(effective_n, p + 1, x_data, y)?;
    let constant = beta[0];
    let ar: Vec<f64> = beta[1..].to_vec();

    Ok((ar, Vec::new(), constant, residuals))
}

/// Joint ARMA estimation via Hannan-Rissanen.
fn estimate_arma(data: &[f64], p: usize, q: usize) -> Result<(Vec<f64>, Vec<f64>, f64, Vec<f64>)> {
    let n = data.len();
    let mean = data.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();

    // Stage 1: long AR for proxy residuals
    let ar_order = long_ar_order(p, q, n);
    let (_, _, _, proxy_residuals) = estimate_ar(&centered, ar_order)?;
    // proxy_residuals[k] corresponds to centered[k + ar_order]

    // Stage 2: joint regression on AR lags and lagged proxy residuals
    let start = ar_order.max(p).max(q);
    let effective_n = n - start;

    let num_params = p + q + 1;
    let mut x_data = Vec::with_capacity(effective_n * num_params);
    let mut y_data = Vec::with_capacity(effective_n);

    for t in start..n {
        y_data.push(centered[t]);
        x_data.push(1.0);
        for i in 1..=p {
            x_data.push(centered[t - i]);
        }
        for i in 1..=q {
            let idx = t - i;
            x_data.push(if idx >= ar_order {
                proxy_residuals[idx - ar_order]
            } else {
                0.0
            });
        }
    }

    let (beta, residuals) = solve_ols(effective_n, num_params, x_data, y_data)?;

    let constant = beta[0] + mean * (1.0 - beta[1..=p].iter().sum::<f64>());
    let ar: Vec<f64> = beta[1..=p].to_vec();
    let ma: Vec<f64> = beta[p + 1..].to_vec();

    Ok((ar, ma, constant, residuals))
}

/// Solve `X'X b = X'y`, returning coefficients and residuals.
fn solve_ols(
    rows: usize,
    cols: usize,
    x_data: Vec<f64>,
    y_data: Vec<f64>,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let x = DMatrix::from_row_slice(rows, cols, &x_data);
    let y = DVector::from_vec(y_data);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;

    let xtx_inv = xtx.try_inverse().ok_or_else(|| {
        ForecastError::ModelFitFailure(
            "Singular normal equations, cannot estimate coefficients".to_string(),
        )
    })?;
    let beta = &xtx_inv * xty;

    let y_hat = &x * &beta;
    let residuals: Vec<f64> = (&y - y_hat).iter().cloned().collect();

    Ok((beta.iter().cloned().collect(), residuals))
}
