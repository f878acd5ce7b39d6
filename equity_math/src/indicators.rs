//! Technical indicator implementations
//!
//! Slice-based implementations of the indicators the analysis report uses:
//! - Simple Moving Average (SMA)
//! - Exponential Moving Average (EMA)
//! - Relative Strength Index (RSI)
//! - Moving Average Convergence Divergence (MACD)
//! - Bollinger Bands

use crate::rolling::{rolling_mean, rolling_std};
use crate::{MathError, Result};

/// Simple moving average; alias over [`rolling_mean`] with indicator naming.
pub fn sma(prices: &[f64], period: usize) -> Result<Vec<f64>> {
    rolling_mean(prices, period)
}

/// Exponential moving average.
///
/// Seeded with the SMA of the first `period` values, then smoothed with
/// multiplier `2 / (period + 1)`. Output has `prices.len() - period + 1`
/// entries, aligned with [`sma`].
pub fn ema(prices: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }
    if prices.len() < period {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} prices for EMA({}), have {}",
            period,
            period,
            prices.len()
        )));
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut current = prices[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(prices.len() - period + 1);
    out.push(current);

    for &price in &prices[period..] {
        current = (price - current) * multiplier + current;
        out.push(current);
    }

    Ok(out)
}

/// Relative Strength Index with Wilder smoothing.
///
/// Output has `prices.len() - period` entries, one per price after the
/// initial averaging window; values are in `[0, 100]`.
pub fn rsi(prices: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }
    if prices.len() <= period {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} prices for RSI({}), have {}",
            period,
            period,
            prices.len()
        )));
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let mut avg_gain = changes[..period].iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
    let mut avg_loss = changes[..period]
        .iter()
        .filter(|c| **c < 0.0)
        .map(|c| -c)
        .sum::<f64>()
        / period as f64;

    let mut out = Vec::with_capacity(changes.len() - period + 1);
    out.push(rsi_value(avg_gain, avg_loss));

    for &change in &changes[period..] {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        // new_avg = (prev_avg * (period - 1) + current) / period
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out.push(rsi_value(avg_gain, avg_loss));
    }

    Ok(out)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    /// EMA(fast) - EMA(slow)
    pub macd: Vec<f64>,
    /// EMA(signal_period) of the MACD line
    pub signal: Vec<f64>,
    /// MACD - signal, aligned with `signal`
    pub histogram: Vec<f64>,
}

/// MACD with the conventional (12, 26, 9) defaults supplied by the caller.
pub fn macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdSeries> {
    if fast_period >= slow_period {
        return Err(MathError::InvalidInput(format!(
            "Fast period ({}) must be shorter than slow period ({})",
            fast_period, slow_period
        )));
    }

    let fast = ema(prices, fast_period)?;
    let slow = ema(prices, slow_period)?;

    // Both EMAs end at the last price; trim the fast one to the slow length.
    let offset = fast.len() - slow.len();
    let macd_line: Vec<f64> = fast[offset..]
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal = ema(&macd_line, signal_period)?;
    let macd_offset = macd_line.len() - signal.len();
    let histogram: Vec<f64> = macd_line[macd_offset..]
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| m - s)
        .collect();

    Ok(MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    })
}

/// Bollinger Bands: middle SMA with upper/lower at `k` standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(prices: &[f64], period: usize, k: f64) -> Result<BollingerSeries> {
    if k <= 0.0 {
        return Err(MathError::InvalidInput(
            "Standard deviation multiplier must be greater than zero".to_string(),
        ));
    }

    let middle = rolling_mean(prices, period)?;
    let std = rolling_std(prices, period)?;

    let upper = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m + k * s)
        .collect();
    let lower = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m - k * s)
        .collect();

    Ok(BollingerSeries {
        upper,
        middle,
        lower,
    })
}
