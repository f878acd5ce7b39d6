use chrono::NaiveDate;
use market_data::{CsvProvider, DataError, MarketDataProvider, Period};
use rstest::rstest;
use std::io::Write;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_fixture(dir: &std::path::Path, symbol: &str, rows: &[(&str, f64)]) {
    let mut file = std::fs::File::create(dir.join(format!("{}.csv", symbol))).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
    for (d, close) in rows {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            d,
            close - 1.0,
            close + 1.0,
            close - 2.0,
            close,
            1000
        )
        .unwrap();
    }
}

#[test]
fn loads_and_filters_by_date_range() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "ACME",
        &[
            ("2024-01-02", 100.0),
            ("2024-01-03", 101.0),
            ("2024-01-04", 102.0),
            ("2024-01-05", 103.0),
        ],
    );

    let provider = CsvProvider::new(dir.path());
    let series = provider
        .fetch_ohlcv("ACME", date(2024, 1, 3), date(2024, 1, 4))
        .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.bars()[0].close, 101.0);
    assert_eq!(series.last_bar().close, 102.0);
}

#[test]
fn unknown_symbol_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CsvProvider::new(dir.path());

    let err = provider
        .fetch_ohlcv("NOPE", date(2024, 1, 1), date(2024, 12, 31))
        .unwrap_err();
    assert!(matches!(err, DataError::DataUnavailable { .. }));
}

#[test]
fn empty_range_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "ACME", &[("2024-01-02", 100.0)]);

    let provider = CsvProvider::new(dir.path());
    let err = provider
        .fetch_ohlcv("ACME", date(2025, 1, 1), date(2025, 12, 31))
        .unwrap_err();
    assert!(matches!(err, DataError::DataUnavailable { .. }));
}

#[test]
fn invalid_rows_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("MIXED.csv")).unwrap();
    writeln!(file, "Date,Open,High,Low,Close").unwrap();
    writeln!(file, "2024-01-02,1,2,0.5,1.5").unwrap();
    writeln!(file, "not-a-date,1,2,0.5,1.5").unwrap();
    writeln!(file, "2024-01-03,1,2,0.5,oops").unwrap();
    writeln!(file, "2024-01-04,2,3,1.5,2.5").unwrap();
    drop(file);

    let provider = CsvProvider::new(dir.path());
    let series = provider
        .fetch_ohlcv("MIXED", date(2024, 1, 1), date(2024, 12, 31))
        .unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn nan_close_rows_are_skipped() {
    // "nan" parses as f64 but must not survive into a series
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("HOLEY.csv")).unwrap();
    writeln!(file, "Date,Open,High,Low,Close").unwrap();
    writeln!(file, "2024-01-02,1,2,0.5,1.5").unwrap();
    writeln!(file, "2024-01-03,1,2,0.5,nan").unwrap();
    writeln!(file, "2024-01-04,2,3,1.5,2.5").unwrap();
    drop(file);

    let provider = CsvProvider::new(dir.path());
    let series = provider
        .fetch_ohlcv("HOLEY", date(2024, 1, 1), date(2024, 12, 31))
        .unwrap();

    assert_eq!(series.len(), 2);
    assert!(series.bars().iter().all(|b| b.close.is_finite()));
}

#[rstest]
#[case::five_days(Period::FiveDays, 5)]
#[case::one_month(Period::OneMonth, 31)]
#[case::max(Period::Max, 40)]
fn close_series_feeds_period_filter(#[case] period: Period, #[case] expected_len: usize) {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<(String, f64)> = (0..40)
        .map(|i| {
            let d = date(2024, 1, 1) + chrono::Days::new(i);
            (d.to_string(), 100.0 + i as f64)
        })
        .collect();
    let borrowed: Vec<(&str, f64)> = rows.iter().map(|(d, c)| (d.as_str(), *c)).collect();
    write_fixture(dir.path(), "LONG", &borrowed);

    let provider = CsvProvider::new(dir.path());
    let close = provider
        .fetch_close("LONG", date(2024, 1, 1), date(2024, 12, 31))
        .unwrap();

    let filtered = period.filter(&close).unwrap();
    assert_eq!(filtered.len(), expected_len);
    assert_eq!(filtered.last_date(), close.last_date());
}
