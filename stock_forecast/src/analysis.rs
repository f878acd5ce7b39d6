//! Descriptive analysis of a stock's recent history
//!
//! The non-forecasting half of the report: last-close snapshot, the tail
//! of the raw OHLCV table and a per-date indicator table. Indicators are
//! always computed over the full history and only then cut down to the
//! requested display period, so a short period still shows warmed-up
//! values instead of a fresh ramp-in.

use crate::error::{ForecastError, Result};
use equity_math::indicators::{bollinger_bands, ema, macd, rsi, sma};
use equity_math::MathError;
use market_data::{OhlcvBar, OhlcvSeries, Period};
use serde::{Deserialize, Serialize};

/// Long simple-moving-average window shown in the indicator table.
pub const SMA_PERIOD: usize = 50;
/// Exponential-moving-average window.
pub const EMA_PERIOD: usize = 20;
/// RSI lookback.
pub const RSI_PERIOD: usize = 14;
/// MACD fast/slow/signal periods.
pub const MACD_PERIODS: (usize, usize, usize) = (12, 26, 9);
/// Bollinger window and standard-deviation multiplier.
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;

/// Number of raw rows shown by [`recent_bars`].
pub const RECENT_ROWS: usize = 10;

/// Latest close with its day-over-day move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub symbol: String,
    pub date: chrono::NaiveDate,
    pub close: f64,
    /// Absolute change versus the previous close.
    pub change: f64,
    /// Change as a percentage of the previous close.
    pub change_percent: f64,
}

/// Build the headline snapshot; needs at least two bars for the change.
pub fn daily_snapshot(series: &OhlcvSeries) -> Result<DailySnapshot> {
    if series.len() < 2 {
        return Err(ForecastError::InsufficientHistory(format!(
            "{}: need at least 2 bars for a daily change, have {}",
            series.symbol(),
            series.len()
        )));
    }

    let bars = series.bars();
    let last = &bars[bars.len() - 1];
    let previous = &bars[bars.len() - 2];

    if previous.close == 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "{}: zero close on {} makes the daily change undefined",
            series.symbol(),
            previous.date
        )));
    }

    Ok(DailySnapshot {
        symbol: series.symbol().to_string(),
        date: last.date,
        close: last.close,
        change: last.close - previous.close,
        change_percent: (last.close - previous.close) / previous.close * 100.0,
    })
}

/// Last [`RECENT_ROWS`] bars, oldest first. Fewer if the series is short.
pub fn recent_bars(series: &OhlcvSeries) -> Vec<OhlcvBar> {
    let bars = series.bars();
    let start = bars.len().saturating_sub(RECENT_ROWS);
    bars[start..].to_vec()
}

/// One dated row of the indicator table. Columns are `None` while their
/// indicator is still inside its warm-up window (or the whole history is
/// too short for it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: chrono::NaiveDate,
    pub close: f64,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

/// Indicator table for one symbol over a display period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    pub symbol: String,
    pub period: Period,
    pub rows: Vec<IndicatorRow>,
}

/// Compute the indicator table over the full series, then keep only the
/// rows inside `period` (anchored at the last available date).
pub fn indicator_table(series: &OhlcvSeries, period: Period) -> Result<IndicatorTable> {
    let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
    let n = closes.len();

    let sma_col = padded_column(n, sma(&closes, SMA_PERIOD))?;
    let ema_col = padded_column(n, ema(&closes, EMA_PERIOD))?;
    let rsi_col = padded_column(n, rsi(&closes, RSI_PERIOD))?;

    let (fast, slow, signal_period) = MACD_PERIODS;
    let (macd_col, signal_col) = match macd(&closes, fast, slow, signal_period) {
        Ok(series) => {
            let macd_col = padded_column(n, Ok(series.macd))?;
            let signal_col = padded_column(n, Ok(series.signal))?;
            (macd_col, signal_col)
        }
        Err(MathError::InsufficientData(_)) => (vec![None; n], vec![None; n]),
        Err(e) => return Err(e.into()),
    };

    let (upper_col, lower_col) = match bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_K) {
        Ok(bands) => (
            padded_column(n, Ok(bands.upper))?,
            padded_column(n, Ok(bands.lower))?,
        ),
        Err(MathError::InsufficientData(_)) => (vec![None; n], vec![None; n]),
        Err(e) => return Err(e.into()),
    };

    let rows: Vec<IndicatorRow> = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            date: bar.date,
            close: bar.close,
            sma: sma_col[i],
            ema: ema_col[i],
            rsi: rsi_col[i],
            macd: macd_col[i],
            macd_signal: signal_col[i],
            bollinger_upper: upper_col[i],
            bollinger_lower: lower_col[i],
        })
        .collect();

    let cutoff = period.cutoff(series.last_bar().date);
    let rows = match cutoff {
        Some(cutoff) => rows.into_iter().filter(|r| r.date > cutoff).collect(),
        None => rows,
    };

    Ok(IndicatorTable {
        symbol: series.symbol().to_string(),
        period,
        rows,
    })
}

/// Right-align an indicator column against the full date index.
///
/// Indicator outputs end at the last price; padding goes on the left.
/// A too-short history turns the whole column into `None` instead of an
/// error, since the table is still useful without that indicator.
fn padded_column(n: usize, values: equity_math::Result<Vec<f64>>) -> Result<Vec<Option<f64>>> {
    match values {
        Ok(values) => {
            let mut column = vec![None; n - values.len()];
            column.extend(values.into_iter().map(Some));
            Ok(column)
        }
        Err(MathError::InsufficientData(_)) => Ok(vec![None; n]),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Days, NaiveDate};
    use pretty_assertions::assert_eq;

    fn ohlcv(values: &[f64]) -> OhlcvSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = values
            .iter()
            .enumerate()
            .map(|(i, close)| OhlcvBar {
                date: start + Days::new(i as u64),
                open: *close,
                high: close + 1.0,
                low: close - 1.0,
                close: *close,
                volume: Some(1000.0),
            })
            .collect();
        OhlcvSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn snapshot_change_matches_last_two_closes() {
        let series = ohlcv(&[100.0, 102.0, 99.0]);
        let snapshot = daily_snapshot(&series).unwrap();

        assert_eq!(snapshot.close, 99.0);
        assert_approx_eq!(snapshot.change, -3.0);
        assert_approx_eq!(snapshot.change_percent, -3.0 / 102.0 * 100.0);
    }

    #[test]
    fn snapshot_needs_two_bars() {
        let series = ohlcv(&[100.0]);
        assert!(matches!(
            daily_snapshot(&series),
            Err(ForecastError::InsufficientHistory(_))
        ));
    }

    #[test]
    fn recent_bars_caps_at_ten() {
        let values: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let series = ohlcv(&values);

        let recent = recent_bars(&series);
        assert_eq!(recent.len(), RECENT_ROWS);
        assert_eq!(recent[RECENT_ROWS - 1].close, 124.0);
        assert_eq!(recent[0].close, 115.0);
    }

    #[test]
    fn recent_bars_short_series_returns_all() {
        let series = ohlcv(&[1.0, 2.0, 3.0]);
        assert_eq!(recent_bars(&series).len(), 3);
    }

    #[test]
    fn indicator_columns_are_right_aligned() {
        let values: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0)
            .collect();
        let series = ohlcv(&values);

        let table = indicator_table(&series, Period::Max).unwrap();
        assert_eq!(table.rows.len(), 120);

        // SMA(50) has its first defined value on the 50th row
        assert!(table.rows[SMA_PERIOD - 2].sma.is_none());
        assert!(table.rows[SMA_PERIOD - 1].sma.is_some());
        // RSI(14) starts one past its window
        assert!(table.rows[RSI_PERIOD - 1].rsi.is_none());
        assert!(table.rows[RSI_PERIOD].rsi.is_some());
        // Every column is defined on the final row
        let last = table.rows.last().unwrap();
        assert!(last.sma.is_some());
        assert!(last.ema.is_some());
        assert!(last.rsi.is_some());
        assert!(last.macd.is_some());
        assert!(last.macd_signal.is_some());
        assert!(last.bollinger_upper.is_some());
    }

    #[test]
    fn short_history_yields_all_none_not_error() {
        let series = ohlcv(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let table = indicator_table(&series, Period::Max).unwrap();

        assert_eq!(table.rows.len(), 5);
        assert!(table.rows.iter().all(|r| r.sma.is_none()));
        assert!(table.rows.iter().all(|r| r.macd.is_none()));
    }

    #[test]
    fn period_filter_keeps_warmed_up_values() {
        let values: Vec<f64> = (0..400)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 3.0)
            .collect();
        let series = ohlcv(&values);

        let table = indicator_table(&series, Period::FiveDays).unwrap();
        assert_eq!(table.rows.len(), 5);
        // Indicators were computed on the full history before filtering
        assert!(table.rows.iter().all(|r| r.sma.is_some()));
        assert!(table.rows.iter().all(|r| r.rsi.is_some()));
    }
}
