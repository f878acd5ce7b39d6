//! Chart period selection
//!
//! Mirrors the period buttons of the reporting layer: a period is resolved
//! relative to the *last* date of the series being filtered, except
//! year-to-date which anchors at January 1st of that last date's year.

use crate::series::{OhlcvSeries, PriceSeries};
use crate::Result;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Time window selector for chart data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    FiveDays,
    OneMonth,
    SixMonths,
    YearToDate,
    OneYear,
    FiveYears,
    Max,
}

impl Period {
    /// Exclusive cutoff date for this period relative to `last`.
    ///
    /// Entries strictly after the cutoff are kept; `Max` keeps everything.
    pub fn cutoff(&self, last: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::FiveDays => last.checked_sub_days(Days::new(5)),
            Period::OneMonth => last.checked_sub_months(Months::new(1)),
            Period::SixMonths => last.checked_sub_months(Months::new(6)),
            Period::OneYear => last.checked_sub_months(Months::new(12)),
            Period::FiveYears => last.checked_sub_months(Months::new(60)),
            Period::YearToDate => {
                // Keep everything from Jan 1 of the last date's year
                NaiveDate::from_ymd_opt(last.year() - 1, 12, 31)
            }
            Period::Max => None,
        }
    }

    /// Filter a price series down to this period.
    pub fn filter(&self, series: &PriceSeries) -> Result<PriceSeries> {
        match self.cutoff(series.last_date()) {
            Some(cutoff) => series.after(cutoff),
            None => Ok(series.clone()),
        }
    }

    /// Filter an OHLCV series down to this period.
    pub fn filter_ohlcv(&self, series: &OhlcvSeries) -> Result<OhlcvSeries> {
        match self.cutoff(series.last_bar().date) {
            Some(cutoff) => series.after(cutoff),
            None => Ok(series.clone()),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::SixMonths => "6mo",
            Period::YearToDate => "ytd",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Period {
    type Err = crate::DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "5d" => Ok(Period::FiveDays),
            "1mo" | "1m" => Ok(Period::OneMonth),
            "6mo" | "6m" => Ok(Period::SixMonths),
            "ytd" => Ok(Period::YearToDate),
            "1y" => Ok(Period::OneYear),
            "5y" => Ok(Period::FiveYears),
            "max" => Ok(Period::Max),
            other => Err(crate::DataError::InvalidValue(format!(
                "Unknown period selector: {}",
                other
            ))),
        }
    }
}
