//! Ordinary least squares regression for a single predictor

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Predicted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares line fit of `y` against `x`.
///
/// Equivalent to a degree-1 polynomial fit. A zero-variance predictor makes
/// the slope undefined and is reported as `DegenerateRegression` instead of
/// letting a division by zero produce NaN.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Predictor length ({}) does not match response length ({})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Need at least 2 observations for a line fit, have {}",
            x.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Regression inputs contain a non-finite value".to_string(),
        ));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let covariance: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
        .sum();
    let x_variance: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();

    if x_variance == 0.0 {
        return Err(MathError::DegenerateRegression(
            "Predictor has zero variance, slope is undefined".to_string(),
        ));
    }

    let slope = covariance / x_variance;
    let intercept = y_mean - slope * x_mean;

    Ok(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn exact_line_recovered() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();

        let fit = linear_fit(&x, &y).unwrap();
        assert_approx_eq!(fit.slope, 3.0);
        assert_approx_eq!(fit.intercept, -2.0);
    }

    #[test]
    fn doubled_series_has_slope_two() {
        let x = vec![1.0, -0.5, 2.0, 0.3, -1.1, 0.8];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();

        let fit = linear_fit(&x, &y).unwrap();
        assert_approx_eq!(fit.slope, 2.0);
        assert_approx_eq!(fit.intercept, 0.0);
    }

    #[test]
    fn zero_variance_predictor_fails() {
        let x = vec![1.0; 10];
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();

        let err = linear_fit(&x, &y).unwrap_err();
        assert!(matches!(err, MathError::DegenerateRegression(_)));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        assert!(linear_fit(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn non_finite_input_is_an_error_not_nan() {
        let x = vec![1.0, f64::NAN, 3.0];
        let y = vec![2.0, 4.0, 6.0];

        let err = linear_fit(&x, &y).unwrap_err();
        assert!(matches!(err, MathError::InvalidInput(_)));
    }

    #[test]
    fn predict_follows_fit() {
        let fit = LinearFit {
            slope: 1.5,
            intercept: 4.0,
        };
        assert_approx_eq!(fit.predict(2.0), 7.0);
    }
}
