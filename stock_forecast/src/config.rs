//! Pipeline configuration
//!
//! Small value struct deserialized from TOML (or built in code) carrying
//! the knobs the dashboard exposed as widgets: history lookback, the
//! smoothing window, the risk-free rate and cache lifetime. Everything
//! has a default so `PipelineConfig::default()` is a working setup.

use crate::error::{ForecastError, Result};
use market_data::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Full configuration for a [`ForecastPipeline`].
///
/// [`ForecastPipeline`]: crate::pipeline::ForecastPipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Years of history fetched before forecasting, 1 to 10.
    pub lookback_years: u32,
    /// Rolling-mean window applied to closes before model fitting.
    pub rolling_window: usize,
    /// Annual risk-free rate in percent used by CAPM.
    pub risk_free_rate: f64,
    /// Lifetime of cached prediction reports, in seconds.
    pub cache_ttl_secs: u64,
    /// Passed through to the data provider.
    pub provider: ProviderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_years: 1,
            rolling_window: 7,
            risk_free_rate: 0.0,
            cache_ttl_secs: 3600,
            provider: ProviderConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Check every field is usable; called by the pipeline constructor.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.lookback_years) {
            return Err(ForecastError::InvalidParameter(format!(
                "lookback_years must be between 1 and 10, got {}",
                self.lookback_years
            )));
        }
        if self.rolling_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "rolling_window must be at least 1".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
