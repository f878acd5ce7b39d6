//! Backtest evaluation of the forecasting model
//!
//! Holds out the tail of the series, fits on the prefix, forecasts the
//! held-out span and reports the root-mean-squared error. The evaluation
//! fit is independent of the full-data fit used for the forward forecast.

use crate::arima::ArimaSpec;
use crate::error::{ForecastError, Result};
use tracing::debug;

/// Number of observations withheld for evaluation; also the forecast
/// horizon used throughout the pipeline.
pub const HOLDOUT: usize = 30;

/// Fixed AR/MA order of the pipeline model.
pub const MODEL_ORDER: usize = 5;

/// Evaluate ARIMA(5, d, 5) on `values` and return the out-of-sample RMSE
/// rounded to 2 decimals.
///
/// Requires `HOLDOUT + ArimaSpec::min_observations()` points so the
/// training prefix alone can support the fit; anything shorter is
/// rejected before any numeric routine runs.
pub fn evaluate_model(values: &[f64], d: usize) -> Result<f64> {
    let spec = ArimaSpec::new(MODEL_ORDER, d, MODEL_ORDER);
    let min_len = HOLDOUT + spec.min_observations();

    if values.len() < min_len {
        return Err(ForecastError::InsufficientHistory(format!(
            "Evaluation of {} needs at least {} observations ({} held out), have {}",
            spec,
            min_len,
            HOLDOUT,
            values.len()
        )));
    }

    let split = values.len() - HOLDOUT;
    let (train, test) = values.split_at(split);

    let fitted = spec.fit(train)?;
    let predictions = fitted.forecast(HOLDOUT)?;

    let rmse = root_mean_squared_error(&predictions, test)?;
    debug!(rmse, d, n = values.len(), "model evaluated");

    Ok((rmse * 100.0).round() / 100.0)
}

/// Root-mean-squared error between two equal-length slices.
pub fn root_mean_squared_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::InvalidParameter(format!(
            "Forecast length ({}) must match actual length ({}) and be non-zero",
            forecast.len(),
            actual.len()
        )));
    }

    let mse = forecast
        .iter()
        .zip(actual.iter())
        .map(|(f, a)| (f - a).powi(2))
        .sum::<f64>()
        / forecast.len() as f64;

    Ok(mse.sqrt())
}
