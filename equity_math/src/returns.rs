//! Return calculations on price series

use crate::{MathError, Result};

/// Trading days per year, used to annualize daily returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Percentage daily returns between consecutive prices.
///
/// Each entry is `(p[i] - p[i-1]) / p[i-1] * 100`, so the output is one
/// element shorter than the input and its first value corresponds to the
/// second price.
pub fn daily_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if prices.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Need at least 2 prices to compute returns, have {}",
            prices.len()
        )));
    }

    prices
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                Err(MathError::CalculationError(
                    "Zero price encountered while computing returns".to_string(),
                ))
            } else {
                Ok((w[1] - w[0]) / w[0] * 100.0)
            }
        })
        .collect()
}

/// Normalize a price series by its first value.
///
/// Used to compare multiple stocks on one chart regardless of price level.
pub fn normalize_to_first(prices: &[f64]) -> Result<Vec<f64>> {
    let first = *prices.first().ok_or_else(|| {
        MathError::InsufficientData("Cannot normalize an empty series".to_string())
    })?;

    if first == 0.0 {
        return Err(MathError::InvalidInput(
            "First price is zero, cannot normalize".to_string(),
        ));
    }

    Ok(prices.iter().map(|p| p / first).collect())
}

/// Annualized return from a series of percentage daily returns.
///
/// Simple scaling by the trading-day count: `mean(daily) * 252`.
pub fn annualized_return(daily_returns: &[f64]) -> Result<f64> {
    if daily_returns.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot annualize an empty return series".to_string(),
        ));
    }

    let mean = daily_returns.iter().sum::<f64>() / daily_returns.len() as f64;
    Ok(mean * TRADING_DAYS_PER_YEAR)
}
