//! End-to-end forecasting pipeline
//!
//! Wires a data provider to the modelling stages: fetch closes over the
//! configured lookback, smooth with a rolling mean, pick the differencing
//! order by repeated stationarity testing, backtest ARIMA(5, d, 5) on a
//! 30-day holdout, refit on everything and forecast 30 days forward.
//! Prediction reports are cached per symbol for the configured TTL.

use crate::analysis::{daily_snapshot, indicator_table, DailySnapshot, IndicatorTable};
use crate::arima::ArimaSpec;
use crate::cache::TtlCache;
use crate::capm::{capm_from_prices, capm_report, CapmEstimate, CapmReport};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::evaluate::{evaluate_model, MODEL_ORDER};
use crate::forecast::forecast_from;
use crate::preprocess::select_differencing_order;
use chrono::{Local, Months, NaiveDate};
use equity_math::returns::normalize_to_first;
use market_data::{MacroDataProvider, MarketDataProvider, Period, PriceSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything the forecasting view needs for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub symbol: String,
    /// Differencing order selected by the stationarity loop.
    pub differencing_order: usize,
    /// Out-of-sample RMSE from the 30-day backtest, rounded to 2 decimals.
    pub rmse: f64,
    /// Smoothed history the model was fitted on.
    pub history: PriceSeries,
    /// 30-day forward forecast, dated from the request origin.
    pub forecast: PriceSeries,
}

/// Forecasting and analysis façade over one data provider.
pub struct ForecastPipeline<P> {
    provider: P,
    config: PipelineConfig,
    predictions: TtlCache<String, PredictionReport>,
}

impl<P: MarketDataProvider + MacroDataProvider> ForecastPipeline<P> {
    /// Build a pipeline; the configuration is validated once here.
    pub fn new(provider: P, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let predictions = TtlCache::new(config.cache_ttl());
        Ok(Self {
            provider,
            config,
            predictions,
        })
    }

    pub fn with_defaults(provider: P) -> Result<Self> {
        Self::new(provider, PipelineConfig::default())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Forecast `symbol` anchored at today. Reports are cached per symbol;
    /// within the TTL a repeat call returns the stored report without
    /// touching the provider.
    pub fn predict(&self, symbol: &str) -> Result<PredictionReport> {
        let today = Local::now().date_naive();
        self.predictions
            .get_or_try_insert_with(symbol.to_string(), || {
                self.predict_with_origin(symbol, today)
            })
    }

    /// Uncached forecast anchored at an explicit `origin` date.
    ///
    /// History is fetched for the configured number of years ending at
    /// `origin`, and the forecast dates start at `origin` itself.
    pub fn predict_with_origin(&self, symbol: &str, origin: NaiveDate) -> Result<PredictionReport> {
        info!("Predicting {} from {}", symbol, origin);

        let closes = self.fetch_window(symbol, origin)?;
        let history = closes.rolling_mean(self.config.rolling_window)?;
        let values = history.values();

        let d = select_differencing_order(&values)?;
        let rmse = evaluate_model(&values, d)?;

        let model = ArimaSpec::new(MODEL_ORDER, d, MODEL_ORDER).fit(&values)?;
        let forecast = forecast_from(&model, origin)?;

        debug!(
            symbol,
            d,
            rmse,
            n = values.len(),
            "prediction report built"
        );

        Ok(PredictionReport {
            symbol: symbol.to_string(),
            differencing_order: d,
            rmse,
            history,
            forecast,
        })
    }

    /// CAPM estimate of `symbol` against a market index series.
    pub fn capm(&self, symbol: &str, market_symbol: &str) -> Result<CapmEstimate> {
        let today = Local::now().date_naive();
        let stock = self.fetch_window(symbol, today)?;
        let market = self.fetch_market_window(market_symbol, today)?;
        capm_from_prices(&stock, &market, self.config.risk_free_rate)
    }

    /// Beta/alpha/expected-return table for several symbols against one
    /// market index, all reduced to their common dates.
    pub fn capm_table(&self, symbols: &[&str], market_symbol: &str) -> Result<CapmReport> {
        let today = Local::now().date_naive();
        let stocks: Vec<PriceSeries> = symbols
            .iter()
            .map(|s| self.fetch_window(s, today))
            .collect::<Result<_>>()?;
        let market = self.fetch_market_window(market_symbol, today)?;
        capm_report(&stocks, &market, self.config.risk_free_rate)
    }

    /// Latest close and day-over-day change for `symbol`.
    pub fn snapshot(&self, symbol: &str) -> Result<DailySnapshot> {
        let today = Local::now().date_naive();
        let bars = self
            .provider
            .fetch_ohlcv(symbol, self.window_start(today), today)?;
        daily_snapshot(&bars)
    }

    /// Technical-indicator table for `symbol` cut to a display period.
    pub fn indicators(&self, symbol: &str, period: Period) -> Result<IndicatorTable> {
        let today = Local::now().date_naive();
        let bars = self
            .provider
            .fetch_ohlcv(symbol, self.window_start(today), today)?;
        indicator_table(&bars, period)
    }

    /// Price histories for several symbols, each divided by its own first
    /// value so different price levels share one comparison chart.
    pub fn normalized_history(&self, symbols: &[&str], period: Period) -> Result<Vec<PriceSeries>> {
        let today = Local::now().date_naive();
        symbols
            .iter()
            .map(|symbol| {
                let closes = self.fetch_window(symbol, today)?;
                let window = period.filter(&closes)?;
                let normalized = normalize_to_first(&window.values())?;
                let entries = window
                    .dates()
                    .zip(normalized)
                    .collect::<Vec<(NaiveDate, f64)>>();
                Ok(PriceSeries::new(window.symbol(), entries)?)
            })
            .collect()
    }

    /// Drop all cached prediction reports.
    pub fn clear_cache(&self) {
        self.predictions.clear();
    }

    fn window_start(&self, end: NaiveDate) -> NaiveDate {
        end.checked_sub_months(Months::new(12 * self.config.lookback_years))
            .unwrap_or(NaiveDate::MIN)
    }

    fn fetch_window(&self, symbol: &str, end: NaiveDate) -> Result<PriceSeries> {
        Ok(self
            .provider
            .fetch_close(symbol, self.window_start(end), end)?)
    }

    fn fetch_market_window(&self, series_id: &str, end: NaiveDate) -> Result<PriceSeries> {
        Ok(self
            .provider
            .fetch_series(series_id, self.window_start(end), end)?)
    }
}
