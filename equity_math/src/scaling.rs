//! Series scaling with invertible parameters
//!
//! Standalone utilities for callers that need a bounded or standardized
//! view of a series. Both scalers retain the parameters estimated from
//! the input so `inverse` exactly undoes `transform` for the same
//! parameters.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Min-max scaler mapping a series into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Estimate scaling parameters from a series.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a scaler on an empty series".to_string(),
            ));
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return Err(MathError::InvalidInput(
                "Series is constant, min-max range is zero".to_string(),
            ));
        }

        Ok(Self { min, max })
    }

    /// Fit and transform in one step.
    pub fn fit_transform(values: &[f64]) -> Result<(Vec<f64>, Self)> {
        let scaler = Self::fit(values)?;
        Ok((scaler.transform(values), scaler))
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        let range = self.max - self.min;
        values.iter().map(|v| (v - self.min) / range).collect()
    }

    pub fn inverse(&self, scaled: &[f64]) -> Vec<f64> {
        let range = self.max - self.min;
        scaled.iter().map(|v| v * range + self.min).collect()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Z-score scaler: `(x - mean) / std`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: f64,
    std: f64,
}

impl StandardScaler {
    /// Estimate mean and population standard deviation from a series.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a scaler on an empty series".to_string(),
            ));
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

        if std == 0.0 {
            return Err(MathError::InvalidInput(
                "Series has zero variance, cannot standardize".to_string(),
            ));
        }

        Ok(Self { mean, std })
    }

    /// Fit and transform in one step.
    pub fn fit_transform(values: &[f64]) -> Result<(Vec<f64>, Self)> {
        let scaler = Self::fit(values)?;
        Ok((scaler.transform(values), scaler))
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.mean) / self.std).collect()
    }

    pub fn inverse(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|v| v * self.std + self.mean).collect()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_maps_to_unit_interval() {
        let data = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let (scaled, _) = MinMaxScaler::fit_transform(&data).unwrap();

        assert_eq!(scaled[0], 0.0);
        assert_eq!(scaled[4], 1.0);
        assert!(scaled[2] > 0.45 && scaled[2] < 0.55);
    }

    #[test]
    fn min_max_round_trip() {
        let data = vec![3.7, -1.2, 88.0, 41.5, 0.003];
        let (scaled, scaler) = MinMaxScaler::fit_transform(&data).unwrap();
        let restored = scaler.inverse(&scaled);

        for (orig, back) in data.iter().zip(restored.iter()) {
            assert!((orig - back).abs() < 1e-10);
        }
    }

    #[test]
    fn min_max_constant_rejected() {
        assert!(MinMaxScaler::fit(&[7.0, 7.0, 7.0]).is_err());
    }

    #[test]
    fn standard_scaler_zero_mean_unit_std() {
        let data = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let (scaled, _) = StandardScaler::fit_transform(&data).unwrap();

        let mean: f64 = scaled.iter().sum::<f64>() / scaled.len() as f64;
        assert!(mean.abs() < 1e-10);

        let var: f64 = scaled.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
        assert!((var.sqrt() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn standard_scaler_round_trip() {
        let data = vec![101.5, 99.0, 120.2, 97.6, 104.4];
        let (scaled, scaler) = StandardScaler::fit_transform(&data).unwrap();
        let restored = scaler.inverse(&scaled);

        for (orig, back) in data.iter().zip(restored.iter()) {
            assert!((orig - back).abs() < 1e-10);
        }
    }

    #[test]
    fn standard_scaler_constant_rejected() {
        assert!(StandardScaler::fit(&[2.0, 2.0]).is_err());
    }
}
