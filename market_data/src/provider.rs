//! Data provider traits and the CSV-backed implementation
//!
//! The actual acquisition protocol (Yahoo-style equity feeds, FRED-style
//! macro series) is a collaborator concern. This module defines the seam:
//! providers return validated [`OhlcvSeries`]/[`PriceSeries`] values or a
//! [`DataError`] the pipeline can report, and are expected to fail within
//! the configured timeout instead of hanging.

use crate::series::{OhlcvBar, OhlcvSeries, PriceSeries};
use crate::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Provider behaviour knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Upper bound on a single fetch. Implementations doing network IO
    /// must fail with `DataUnavailable` once this elapses.
    #[serde(with = "humantime_secs")]
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

mod humantime_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

/// Source of historical equity bars.
pub trait MarketDataProvider {
    /// Fetch daily OHLCV history for `symbol` in `[start, end]` inclusive.
    ///
    /// An unknown symbol or an empty range is `DataUnavailable`, which the
    /// request pipeline reports without crashing.
    fn fetch_ohlcv(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<OhlcvSeries>;

    /// Closing prices only; default goes through [`fetch_ohlcv`].
    ///
    /// [`fetch_ohlcv`]: MarketDataProvider::fetch_ohlcv
    fn fetch_close(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        Ok(self.fetch_ohlcv(symbol, start, end)?.close_series())
    }
}

/// Source of single-column macro series (e.g. a market index level).
pub trait MacroDataProvider {
    fn fetch_series(&self, series_id: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries>;
}

/// Provider reading per-symbol CSV files from a directory.
///
/// Files are named `<SYMBOL>.csv` with a header containing `date`, `open`,
/// `high`, `low`, `close` and optionally `volume` columns (case
/// insensitive, any order). Used for local data sets and tests.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    root: PathBuf,
    config: ProviderConfig,
}

impl CsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: ProviderConfig::default(),
        }
    }

    pub fn with_config(root: impl Into<PathBuf>, config: ProviderConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{}.csv", symbol))
    }

    fn load_file(&self, symbol: &str, path: &Path) -> Result<Vec<OhlcvBar>> {
        info!("Loading {} from {}", symbol, path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let columns = resolve_columns(&headers).ok_or_else(|| DataError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("{} is missing date/OHLC columns", path.display()),
        })?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for (row_num, record) in reader.records().enumerate() {
            let record = record?;
            match columns.parse_row(&record) {
                Ok(bar) => bars.push(bar),
                Err(e) => {
                    debug!("Skipping row {}: {}", row_num + 1, e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} invalid rows in {}", skipped, path.display());
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

impl MarketDataProvider for CsvProvider {
    fn fetch_ohlcv(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<OhlcvSeries> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("no data file at {}", path.display()),
            });
        }

        let bars: Vec<OhlcvBar> = self
            .load_file(symbol, &path)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(DataError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("no rows between {} and {}", start, end),
            });
        }

        debug!("{}: {} bars in range", symbol, bars.len());
        OhlcvSeries::new(symbol, bars)
    }
}

impl MacroDataProvider for CsvProvider {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        self.fetch_close(series_id, start, end)
    }
}

struct ColumnMap {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl ColumnMap {
    fn parse_row(&self, record: &csv::StringRecord) -> Result<OhlcvBar> {
        let field = |idx: usize| -> Result<&str> {
            record.get(idx).ok_or_else(|| {
                DataError::InvalidValue(format!("missing field at column {}", idx))
            })
        };

        let date = field(self.date)?.parse::<NaiveDate>()?;
        let parse_num = |idx: usize| -> Result<f64> {
            let raw = field(idx)?;
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(DataError::InvalidValue(format!(
                    "'{}' is not a finite number",
                    raw
                ))),
            }
        };

        let volume = match self.volume {
            Some(idx) => field(idx)?.parse::<f64>().ok(),
            None => None,
        };

        Ok(OhlcvBar {
            date,
            open: parse_num(self.open)?,
            high: parse_num(self.high)?,
            low: parse_num(self.low)?,
            close: parse_num(self.close)?,
            volume,
        })
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> Option<ColumnMap> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.to_ascii_lowercase().contains(name))
    };

    Some(ColumnMap {
        date: find("date").or_else(|| find("time"))?,
        open: find("open")?,
        high: find("high")?,
        low: find("low")?,
        close: find("close")?,
        volume: find("vol"),
    })
}

/// In-memory provider for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct StaticProvider {
    series: HashMap<String, OhlcvSeries>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: OhlcvSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }
}

impl MarketDataProvider for StaticProvider {
    fn fetch_ohlcv(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<OhlcvSeries> {
        let source = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "unknown symbol".to_string(),
            })?;

        let bars: Vec<OhlcvBar> = source
            .bars()
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();

        if bars.is_empty() {
            return Err(DataError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("no rows between {} and {}", start, end),
            });
        }

        OhlcvSeries::new(symbol, bars)
    }
}

impl MacroDataProvider for StaticProvider {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        self.fetch_close(series_id, start, end)
    }
}
