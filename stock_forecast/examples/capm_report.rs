use chrono::{Days, Local, NaiveDate};
use market_data::{OhlcvBar, OhlcvSeries, StaticProvider};
use stock_forecast::{ForecastPipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("Stock Forecast: CAPM Report Example");
    println!("===================================\n");

    let today = Local::now().date_naive();
    let start = today - Days::new(364);

    // A synthetic market index plus three stocks with different betas
    let index: Vec<f64> = (0..365)
        .map(|i| 4000.0 + (i as f64 * 0.15).sin() * 120.0 + ((i * 41) % 29) as f64 * 3.0)
        .collect();

    let mut provider = StaticProvider::new();
    provider.insert(series_from("SP500", start, &index)?);
    provider.insert(series_from(
        "STEADY",
        start,
        &scale(&index, 0.01, 30.0, 0.5),
    )?);
    provider.insert(series_from(
        "GROWTH",
        start,
        &scale(&index, 0.05, -50.0, 4.0),
    )?);
    provider.insert(series_from(
        "WILD",
        start,
        &scale(&index, 0.09, -200.0, 9.0),
    )?);

    let pipeline = ForecastPipeline::new(provider, PipelineConfig::default())?;
    let report = pipeline.capm_table(&["STEADY", "GROWTH", "WILD"], "SP500")?;

    println!("Market index:              {}", report.market_symbol);
    println!(
        "Annualized market return:  {:.2}%\n",
        report.annualized_market_return
    );

    println!("{:<8} {:>8} {:>8} {:>12}", "Symbol", "Beta", "Alpha", "Expected %/yr");
    for row in &report.rows {
        println!(
            "{:<8} {:>8.2} {:>8.2} {:>12.2}",
            row.symbol, row.beta, row.alpha, row.expected_annual_return
        );
    }

    Ok(())
}

fn scale(index: &[f64], factor: f64, offset: f64, wobble: f64) -> Vec<f64> {
    index
        .iter()
        .enumerate()
        .map(|(i, v)| v * factor + offset + (i as f64 * 0.7).sin() * wobble)
        .collect()
}

fn series_from(
    symbol: &str,
    start: NaiveDate,
    closes: &[f64],
) -> Result<OhlcvSeries, Box<dyn std::error::Error>> {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| OhlcvBar {
            date: start + Days::new(i as u64),
            open: *close,
            high: close + 1.0,
            low: close - 1.0,
            close: *close,
            volume: Some(1.0e6),
        })
        .collect();

    Ok(OhlcvSeries::new(symbol, bars)?)
}
