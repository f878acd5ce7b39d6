//! Error types for the stock_forecast crate

use thiserror::Error;

/// Failures surfaced by the forecasting pipeline.
///
/// Everything here is recoverable at the request boundary: a variant
/// terminates the current request with a reportable message and never
/// crashes the process or invalidates cached results for other keys.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer observations than a downstream step requires; detected up
    /// front, not discovered via a numeric crash.
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// The estimation procedure failed (singular normal equations,
    /// non-finite coefficients). Distinct from data problems.
    #[error("Model fit failure: {0}")]
    ModelFitFailure(String),

    /// A forecast could not be produced from a fitted model.
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Caller-supplied parameter out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the numeric layer.
    #[error(transparent)]
    Math(#[from] equity_math::MathError),

    /// Error from the data layer.
    #[error(transparent)]
    Data(#[from] market_data::DataError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
