use chrono::{Days, NaiveDate};
use market_data::{OhlcvBar, OhlcvSeries, StaticProvider};
use stock_forecast::{ForecastPipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("Stock Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Build a year of synthetic daily bars for one ticker
    println!("Creating sample data...");
    let origin = NaiveDate::from_ymd_opt(2025, 6, 2).ok_or("bad date")?;
    let series = sample_series("ACME", origin - Days::new(364), 365)?;
    println!("Sample data created: {} daily bars\n", series.len());

    let mut provider = StaticProvider::new();
    provider.insert(series);

    let pipeline = ForecastPipeline::new(provider, PipelineConfig::default())?;

    println!("Running the forecasting pipeline...");
    let report = pipeline.predict_with_origin("ACME", origin)?;

    println!("Symbol:              {}", report.symbol);
    println!("Differencing order:  {}", report.differencing_order);
    println!("Backtest RMSE:       {:.2}", report.rmse);
    println!("Forecast range:      {} .. {}", report.forecast.first_date(), report.forecast.last_date());

    println!("\nFirst 5 forecast values:");
    for (date, value) in report.forecast.entries().iter().take(5) {
        println!("  {}  {:.2}", date, value);
    }

    println!("\nForecasting complete!");
    Ok(())
}

fn sample_series(
    symbol: &str,
    start: NaiveDate,
    days: usize,
) -> Result<OhlcvSeries, Box<dyn std::error::Error>> {
    let bars = (0..days)
        .map(|i| {
            let close = 150.0 + (i as f64 * 0.2).sin() * 8.0 + ((i * 31) % 23) as f64 * 0.3;
            OhlcvBar {
                date: start + Days::new(i as u64),
                open: close - 0.4,
                high: close + 1.2,
                low: close - 1.2,
                close,
                volume: Some(2.0e6),
            }
        })
        .collect();

    Ok(OhlcvSeries::new(symbol, bars)?)
}
