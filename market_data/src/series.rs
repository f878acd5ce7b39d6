//! Date-indexed series types

use crate::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single-column series of (date, value) pairs with a strictly
/// increasing date index. The source of truth for all downstream
/// calculations; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    entries: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    /// Build a series, validating order and uniqueness of dates.
    pub fn new(symbol: impl Into<String>, entries: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let symbol = symbol.into();
        if entries.is_empty() {
            return Err(DataError::EmptySeries(symbol));
        }

        for pair in entries.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(DataError::UnorderedDates(format!(
                    "{}: {} does not follow {}",
                    symbol, pair[1].0, pair[0].0
                )));
            }
        }

        if let Some((date, value)) = entries.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DataError::InvalidValue(format!(
                "{}: non-finite value {} on {}",
                symbol, value, date
            )));
        }

        Ok(Self { symbol, entries })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(NaiveDate, f64)] {
        &self.entries
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(|(d, _)| *d)
    }

    /// Values in date order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.entries[0].0
    }

    pub fn last_date(&self) -> NaiveDate {
        self.entries[self.entries.len() - 1].0
    }

    pub fn last_value(&self) -> f64 {
        self.entries[self.entries.len() - 1].1
    }

    /// Sub-series with dates strictly after `cutoff`.
    pub fn after(&self, cutoff: NaiveDate) -> Result<Self> {
        let entries: Vec<_> = self
            .entries
            .iter()
            .filter(|(d, _)| *d > cutoff)
            .cloned()
            .collect();
        Self::new(self.symbol.clone(), entries)
    }

    /// Inner join with another series on date.
    ///
    /// Only overlapping dates are retained; both outputs share one index.
    /// An empty intersection is an error, never a silent empty result.
    pub fn align(&self, other: &PriceSeries) -> Result<(Self, Self)> {
        let mut left = Vec::new();
        let mut right = Vec::new();

        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (da, va) = self.entries[i];
            let (db, vb) = other.entries[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Equal => {
                    left.push((da, va));
                    right.push((db, vb));
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }

        if left.is_empty() {
            return Err(DataError::AlignmentEmpty {
                left: self.symbol.clone(),
                right: other.symbol.clone(),
            });
        }

        Ok((
            Self {
                symbol: self.symbol.clone(),
                entries: left,
            },
            Self {
                symbol: other.symbol.clone(),
                entries: right,
            },
        ))
    }

    /// Reduce several series to their common date index.
    ///
    /// Generalizes [`align`](PriceSeries::align): the output series all
    /// share the intersection of every input's dates, in order. An empty
    /// intersection is an error.
    pub fn align_many(series: &[PriceSeries]) -> Result<Vec<PriceSeries>> {
        let first = series.first().ok_or_else(|| {
            DataError::EmptySeries("align_many called with no series".to_string())
        })?;

        let mut common: std::collections::BTreeSet<NaiveDate> = first.dates().collect();
        for s in &series[1..] {
            let dates: std::collections::BTreeSet<NaiveDate> = s.dates().collect();
            common = common.intersection(&dates).cloned().collect();
        }

        if common.is_empty() {
            return Err(DataError::AlignmentEmpty {
                left: first.symbol.clone(),
                right: series[series.len() - 1].symbol.clone(),
            });
        }

        Ok(series
            .iter()
            .map(|s| Self {
                symbol: s.symbol.clone(),
                entries: s
                    .entries
                    .iter()
                    .filter(|(d, _)| common.contains(d))
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    /// Percentage daily returns as a new series.
    ///
    /// One entry shorter than the source; the first defined value sits on
    /// the second source date.
    pub fn daily_returns(&self) -> Result<Self> {
        if self.entries.len() < 2 {
            return Err(DataError::EmptySeries(format!(
                "{}: need at least 2 observations for returns",
                self.symbol
            )));
        }

        let mut entries = Vec::with_capacity(self.entries.len() - 1);
        for pair in self.entries.windows(2) {
            let (_, prev) = pair[0];
            let (date, cur) = pair[1];
            if prev == 0.0 {
                return Err(DataError::InvalidValue(format!(
                    "{}: zero price before {}",
                    self.symbol, date
                )));
            }
            entries.push((date, (cur - prev) / prev * 100.0));
        }

        Ok(Self {
            symbol: self.symbol.clone(),
            entries,
        })
    }

    /// Rolling mean of the values as a new series, indexed by the last
    /// date of each window. Output is `window - 1` entries shorter.
    pub fn rolling_mean(&self, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(DataError::InvalidValue(
                "Rolling window must be greater than zero".to_string(),
            ));
        }
        if self.entries.len() < window {
            return Err(DataError::EmptySeries(format!(
                "{}: {} observations are too few for a window of {}",
                self.symbol,
                self.entries.len(),
                window
            )));
        }

        let mut entries = Vec::with_capacity(self.entries.len() - window + 1);
        let mut sum: f64 = self.entries[..window].iter().map(|(_, v)| v).sum();
        entries.push((self.entries[window - 1].0, sum / window as f64));

        for i in window..self.entries.len() {
            sum += self.entries[i].1 - self.entries[i - window].1;
            entries.push((self.entries[i].0, sum / window as f64));
        }

        Ok(Self {
            symbol: self.symbol.clone(),
            entries,
        })
    }
}

/// Daily bar with open/high/low/close and optional volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

/// OHLCV table with a strictly increasing date index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl OhlcvSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(DataError::EmptySeries(symbol));
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::UnorderedDates(format!(
                    "{}: {} does not follow {}",
                    symbol, pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(bar) = bars
            .iter()
            .find(|b| ![b.open, b.high, b.low, b.close].iter().all(|v| v.is_finite()))
        {
            return Err(DataError::InvalidValue(format!(
                "{}: non-finite price in bar on {}",
                symbol, bar.date
            )));
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn last_bar(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 1]
    }

    /// Closing prices as a [`PriceSeries`].
    pub fn close_series(&self) -> PriceSeries {
        PriceSeries {
            symbol: self.symbol.clone(),
            entries: self.bars.iter().map(|b| (b.date, b.close)).collect(),
        }
    }

    /// Bars with dates strictly after `cutoff`.
    pub fn after(&self, cutoff: NaiveDate) -> Result<Self> {
        let bars: Vec<_> = self.bars.iter().filter(|b| b.date > cutoff).cloned().collect();
        Self::new(self.symbol.clone(), bars)
    }
}
