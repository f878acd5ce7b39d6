//! # Equity Math
//!
//! Numeric building blocks for equity analytics. This crate provides the
//! pure calculations the rest of the workspace is built on:
//!
//! - Daily returns and price normalization
//! - Rolling statistics (mean, standard deviation)
//! - Technical indicators (SMA, EMA, RSI, MACD, Bollinger Bands)
//! - Min-max and z-score scaling with exact inverses
//! - Ordinary least squares regression (beta/alpha estimation)
//! - Augmented Dickey-Fuller stationarity testing
//!
//! Everything operates on plain `&[f64]` slices and returns owned vectors;
//! date handling lives in the `market_data` crate.

use thiserror::Error;

pub mod indicators;
pub mod regression;
pub mod returns;
pub mod rolling;
pub mod scaling;
pub mod stationarity;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate regression: {0}")]
    DegenerateRegression(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;

pub use regression::{linear_fit, LinearFit};
pub use scaling::{MinMaxScaler, StandardScaler};
pub use stationarity::{adf_test, AdfResult};
