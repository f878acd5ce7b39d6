//! # Stock Forecast
//!
//! Equity analytics and price forecasting over pluggable data providers.
//!
//! ## Features
//!
//! - End-to-end forecasting pipeline: rolling-mean smoothing, automatic
//!   differencing via repeated stationarity testing, ARIMA(5, d, 5)
//!   estimation, a 30-day backtest with RMSE and a 30-day forward forecast
//! - CAPM beta/alpha and expected annual return, single stock or a whole
//!   table against one market index
//! - Daily snapshot and technical-indicator tables (SMA, EMA, RSI, MACD,
//!   Bollinger Bands) with chart-period filtering
//! - Per-symbol TTL caching of prediction reports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use market_data::CsvProvider;
//! use stock_forecast::{ForecastPipeline, PipelineConfig};
//!
//! # fn main() -> stock_forecast::Result<()> {
//! let provider = CsvProvider::new("data");
//! let pipeline = ForecastPipeline::new(provider, PipelineConfig::default())?;
//!
//! let report = pipeline.predict("AAPL")?;
//! println!(
//!     "{}: RMSE {:.2}, d = {}",
//!     report.symbol, report.rmse, report.differencing_order
//! );
//!
//! let capm = pipeline.capm("AAPL", "SP500")?;
//! println!("beta {:.2}, expected {:.2}%/yr", capm.beta, capm.expected_annual_return);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod arima;
pub mod cache;
pub mod capm;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod forecast;
pub mod pipeline;
pub mod preprocess;

// Re-export commonly used types
pub use crate::analysis::{DailySnapshot, IndicatorRow, IndicatorTable};
pub use crate::arima::{ArimaSpec, FittedArima};
pub use crate::cache::TtlCache;
pub use crate::capm::{CapmEstimate, CapmReport, CapmRow};
pub use crate::config::PipelineConfig;
pub use crate::error::{ForecastError, Result};
pub use crate::pipeline::{ForecastPipeline, PredictionReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
