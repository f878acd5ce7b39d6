use rstest::rstest;
use stock_forecast::arima::ArimaSpec;
use stock_forecast::evaluate::evaluate_model;
use stock_forecast::preprocess::select_differencing_order;
use stock_forecast::ForecastError;

fn noisy_level(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0 + ((i * 23) % 13) as f64 * 0.2)
        .collect()
}

fn trending(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 50.0 + i as f64 * 0.8 + (i as f64 * 0.3).sin() * 2.0)
        .collect()
}

#[rstest]
#[case::level(0)]
#[case::first_difference(1)]
#[case::second_difference(2)]
fn fit_and_forecast_at_each_order(#[case] d: usize) {
    let values = if d == 0 { noisy_level(200) } else { trending(200) };
    let spec = ArimaSpec::new(5, d, 5);

    let fitted = spec.fit(&values).unwrap();
    let forecast = fitted.forecast(30).unwrap();

    assert_eq!(forecast.len(), 30);
    assert!(forecast.iter().all(|v| v.is_finite()));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
fn minimum_length_guard_per_order(#[case] d: usize) {
    let spec = ArimaSpec::new(5, d, 5);
    let min = spec.min_observations();

    let short = noisy_level(min - 1);
    assert!(matches!(
        spec.fit(&short),
        Err(ForecastError::InsufficientHistory(_))
    ));
}

#[test]
fn stationary_series_selects_order_zero() {
    let values = noisy_level(250);
    assert_eq!(select_differencing_order(&values).unwrap(), 0);
}

#[test]
fn trending_series_selects_positive_order() {
    let values = trending(250);
    let d = select_differencing_order(&values).unwrap();
    assert!(d >= 1);
    assert!(d <= 3);
}

#[test]
fn integrated_forecast_continues_a_linear_trend() {
    // Near-linear growth: after one difference the series is almost flat,
    // so the integrated forecast should keep climbing from the last level.
    let values: Vec<f64> = (0..200)
        .map(|i| 10.0 + i as f64 * 1.5 + (i as f64 * 0.5).sin() * 0.2)
        .collect();

    let fitted = ArimaSpec::new(5, 1, 5).fit(&values).unwrap();
    let forecast = fitted.forecast(30).unwrap();

    let last = *values.last().unwrap();
    assert!(forecast[29] > last + 10.0);
    assert!(forecast[29] < last + 90.0);
}

#[test]
fn evaluation_is_deterministic() {
    let values = noisy_level(200);
    let first = evaluate_model(&values, 0).unwrap();
    let second = evaluate_model(&values, 0).unwrap();
    assert_eq!(first, second);
}
