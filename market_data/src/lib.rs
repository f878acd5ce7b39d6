//! # Market Data
//!
//! Date-indexed price series for equity analytics:
//!
//! - [`PriceSeries`] and [`OhlcvSeries`] with a strictly increasing date
//!   index enforced at construction
//! - Inner-join alignment of series from different providers
//! - Chart-period filtering (5 days through max history)
//! - Provider traits for equity and macro data plus a CSV-backed
//!   implementation for local files and tests
//!
//! Network acquisition itself is a collaborator concern; implementors of
//! [`provider::MarketDataProvider`] are expected to respect the configured
//! timeout and report failures as [`DataError::DataUnavailable`].

use thiserror::Error;

pub mod period;
pub mod provider;
pub mod series;

/// Errors from data loading and series handling
#[derive(Error, Debug)]
pub enum DataError {
    /// Provider returned nothing usable for the requested ticker/range
    #[error("Data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Inner join of two series left no overlapping dates
    #[error("No overlapping dates between {left} and {right}")]
    AlignmentEmpty { left: String, right: String },

    #[error("Empty series: {0}")]
    EmptySeries(String),

    #[error("Dates must be strictly increasing: {0}")]
    UnorderedDates(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

pub use period::Period;
pub use provider::{
    CsvProvider, MacroDataProvider, MarketDataProvider, ProviderConfig, StaticProvider,
};
pub use series::{OhlcvBar, OhlcvSeries, PriceSeries};
