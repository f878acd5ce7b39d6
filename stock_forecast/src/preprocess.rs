//! Series preparation ahead of model fitting
//!
//! Smoothing, differencing-order selection and the difference/integrate
//! helpers the ARIMA model builds on.

use crate::error::Result;
use equity_math::stationarity::adf_test;
use tracing::debug;

/// Hard cap on the differencing order.
///
/// A series may remain non-stationary after this many differences; the
/// pipeline accepts that degraded quality instead of looping further.
pub const MAX_DIFFERENCING_ORDER: usize = 3;

/// Choose a differencing order in `0..=MAX_DIFFERENCING_ORDER`.
///
/// Differences repeatedly while the ADF test still reports a unit root
/// (p > 0.05) and the cap has not been reached. Propagates the ADF error
/// when the series is too short to test at all.
pub fn select_differencing_order(values: &[f64]) -> Result<usize> {
    let mut current = values.to_vec();
    let mut p_value = adf_test(&current)?.p_value;
    let mut order = 0;

    while p_value > equity_math::stationarity::STATIONARY_P_VALUE
        && order < MAX_DIFFERENCING_ORDER
    {
        order += 1;
        current = difference_once(&current);
        p_value = adf_test(&current)?.p_value;
    }

    debug!(order, p_value, "differencing order selected");
    Ok(order)
}

/// One round of first-order differencing; output is one element shorter.
pub fn difference_once(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Apply `d` rounds of first-order differencing.
pub fn difference(values: &[f64], d: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    for _ in 0..d {
        if out.len() < 2 {
            return Vec::new();
        }
        out = difference_once(&out);
    }
    out
}

/// Last values of each differencing level, used to invert the transform.
///
/// Index `k` holds the final element of the series differenced `k` times;
/// the result has `d` entries (levels `0..d`).
pub fn difference_anchors(values: &[f64], d: usize) -> Vec<f64> {
    let mut anchors = Vec::with_capacity(d);
    let mut current = values.to_vec();
    for _ in 0..d {
        anchors.push(*current.last().unwrap_or(&0.0));
        current = difference_once(&current);
    }
    anchors
}

/// Integrate a forecast made on the `d`-times differenced scale back to
/// the original scale, using anchors from [`difference_anchors`].
pub fn undifference(forecast: &[f64], anchors: &[f64]) -> Vec<f64> {
    let mut out = forecast.to_vec();
    for anchor in anchors.iter().rev() {
        let mut cumsum = *anchor;
        for value in out.iter_mut() {
            cumsum += *value;
            *value = cumsum;
        }
    }
    out
}
