//! Capital Asset Pricing Model calculations
//!
//! Beta and alpha come from an ordinary least-squares fit of stock daily
//! returns against market daily returns; the expected annual return is
//! `rf + beta * (annualized market return - rf)` with the risk-free rate
//! a fixed configuration value (zero by default, never computed).

use crate::error::{ForecastError, Result};
use equity_math::regression::linear_fit;
use equity_math::returns::annualized_return;
use market_data::PriceSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// CAPM estimate for one stock against a market index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmEstimate {
    /// Regression slope of stock return on market return
    pub beta: f64,
    /// Regression intercept
    pub alpha: f64,
    /// `rf + beta * (rm - rf)` in percent per year
    pub expected_annual_return: f64,
}

/// One row of the multi-stock report, rounded for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapmRow {
    pub symbol: String,
    pub beta: f64,
    pub alpha: f64,
    pub expected_annual_return: f64,
}

/// Beta/alpha/return table for a set of stocks against one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapmReport {
    pub market_symbol: String,
    pub annualized_market_return: f64,
    pub rows: Vec<CapmRow>,
}

/// CAPM estimate from two *price* series.
///
/// The series are aligned on date first; returns are computed on the
/// aligned prices so both regressors share one index.
pub fn capm_from_prices(
    stock: &PriceSeries,
    market: &PriceSeries,
    risk_free_rate: f64,
) -> Result<CapmEstimate> {
    let (stock_aligned, market_aligned) = stock.align(market)?;
    if stock_aligned.len() < 3 {
        return Err(ForecastError::InsufficientHistory(format!(
            "Only {} overlapping dates between {} and {}, need at least 3 for returns regression",
            stock_aligned.len(),
            stock.symbol(),
            market.symbol()
        )));
    }

    let stock_returns = stock_aligned.daily_returns()?;
    let market_returns = market_aligned.daily_returns()?;

    capm_from_returns(
        &stock_returns.values(),
        &market_returns.values(),
        risk_free_rate,
    )
}

/// CAPM estimate from two aligned daily-return series (percent).
pub fn capm_from_returns(
    stock_returns: &[f64],
    market_returns: &[f64],
    risk_free_rate: f64,
) -> Result<CapmEstimate> {
    // Zero-variance market returns surface as DegenerateRegression here
    let fit = linear_fit(market_returns, stock_returns)?;
    let rm = annualized_return(market_returns)?;

    let expected = risk_free_rate + fit.slope * (rm - risk_free_rate);
    debug!(beta = fit.slope, alpha = fit.intercept, rm, "CAPM estimate");

    Ok(CapmEstimate {
        beta: fit.slope,
        alpha: fit.intercept,
        expected_annual_return: expected,
    })
}

/// Multi-stock CAPM report against one market index.
///
/// All stocks and the index are reduced to their common date range before
/// returns are taken; report values are rounded to 2 decimals as in the
/// displayed table.
pub fn capm_report(
    stocks: &[PriceSeries],
    market: &PriceSeries,
    risk_free_rate: f64,
) -> Result<CapmReport> {
    if stocks.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "CAPM report needs at least one stock".to_string(),
        ));
    }

    let mut all: Vec<PriceSeries> = stocks.to_vec();
    all.push(market.clone());
    let aligned = PriceSeries::align_many(&all)?;

    let market_aligned = &aligned[aligned.len() - 1];
    let market_returns = market_aligned.daily_returns()?.values();
    let rm = annualized_return(&market_returns)?;

    let mut rows = Vec::with_capacity(stocks.len());
    for stock in &aligned[..aligned.len() - 1] {
        let stock_returns = stock.daily_returns()?.values();
        let estimate = capm_from_returns(&stock_returns, &market_returns, risk_free_rate)?;
        rows.push(CapmRow {
            symbol: stock.symbol().to_string(),
            beta: round2(estimate.beta),
            alpha: round2(estimate.alpha),
            expected_annual_return: round2(estimate.expected_annual_return),
        });
    }

    Ok(CapmReport {
        market_symbol: market.symbol().to_string(),
        annualized_market_return: round2(rm),
        rows,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
