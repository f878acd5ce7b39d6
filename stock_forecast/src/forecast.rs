//! Forward forecasting over a fixed 30-day horizon

use crate::arima::FittedArima;
use crate::error::Result;
use chrono::{Days, NaiveDate};
use market_data::PriceSeries;

/// Fixed forward horizon in calendar days.
pub const HORIZON: usize = 30;

/// Produce the 30-day forward forecast as a date-indexed series.
///
/// Dates are `HORIZON` consecutive calendar days starting *at* `origin`.
/// The pipeline passes the invocation day, not the last historical date,
/// so a chart overlaying history and forecast can show a gap or overlap
/// between the two ranges; callers wanting seamless continuation should
/// pass the day after the series end instead.
pub fn forecast_from(model: &FittedArima, origin: NaiveDate) -> Result<PriceSeries> {
    let values = model.forecast(HORIZON)?;

    let entries: Vec<(NaiveDate, f64)> = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| (origin + Days::new(i as u64), value))
        .collect();

    Ok(PriceSeries::new("forecast", entries)?)
}
