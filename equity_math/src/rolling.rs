//! Rolling-window statistics

use crate::{MathError, Result};

/// Rolling mean over a fixed window.
///
/// The output has `values.len() - window + 1` entries; leading positions
/// without a full window are dropped rather than padded.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>> {
    validate_window(values, window)?;

    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / window as f64);
    }

    Ok(out)
}

/// Rolling population standard deviation over a fixed window.
pub fn rolling_std(values: &[f64], window: usize) -> Result<Vec<f64>> {
    validate_window(values, window)?;

    let out = values
        .windows(window)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / window as f64;
            let var = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
            var.sqrt()
        })
        .collect();

    Ok(out)
}

fn validate_window(values: &[f64], window: usize) -> Result<()> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }
    if values.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} values for a window of {}, have {}",
            window,
            window,
            values.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn rolling_mean_length_and_values() {
        let values = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];
        let ma = rolling_mean(&values, 3).unwrap();

        assert_eq!(ma.len(), values.len() - 2);
        assert_approx_eq!(ma[0], 20.0);
        assert_approx_eq!(ma[4], 60.0);
    }

    // First mean over an arithmetic 1..=n sequence is (w + 1) / 2
    #[rstest]
    #[case(3, 2.0)]
    #[case(7, 4.0)]
    #[case(20, 10.5)]
    fn rolling_mean_window_sizes(#[case] window: usize, #[case] first: f64) {
        let values: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let ma = rolling_mean(&values, window).unwrap();
        assert_eq!(ma.len(), values.len() - window + 1);
        assert_approx_eq!(ma[0], first);
    }

    #[test]
    fn rolling_std_constant_is_zero() {
        let values = vec![5.0; 10];
        let sd = rolling_std(&values, 4).unwrap();
        assert!(sd.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn window_larger_than_data() {
        assert!(rolling_mean(&[1.0, 2.0], 3).is_err());
    }

    #[test]
    fn zero_window_rejected() {
        assert!(rolling_mean(&[1.0, 2.0], 0).is_err());
    }
}
