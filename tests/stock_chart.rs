use chrono::NaiveDate;
use quickcheck_macros::quickcheck;
use stock_chart_wasm::domain::chart::{CandleDirection, Color, LookAndFeel};
use stock_chart_wasm::domain::errors::ChartError;
use stock_chart_wasm::domain::market_data::{IndicatorKind, IndicatorSpec, PricePoint, PriceSeries};
use stock_chart_wasm::{ChartConfig, DEFAULT_DAYS, StockChart};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
}

/// Daily series alternating up and down candles, with every third day flat
fn sample_series(len: usize) -> PriceSeries {
    let points = start()
        .iter_days()
        .take(len)
        .enumerate()
        .map(|(i, date)| {
            let open = 100.0 + i as f64;
            let close = match i % 3 {
                0 => open + 1.5,
                1 => open - 0.5,
                _ => open,
            };
            PricePoint::new(date, open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

#[test]
fn defaults() {
    let chart = StockChart::new(sample_series(3));
    assert_eq!(chart.title(), "");
    assert_eq!(chart.days(), DEFAULT_DAYS);
    assert_eq!(chart.style().width, 600);
    assert_eq!(chart.style().height, 400);
    assert!(chart.indicators().is_empty());
}

#[test]
fn window_keeps_most_recent_days() {
    let figure = StockChart::new(sample_series(40)).set_days(10).build().unwrap();
    assert_eq!(figure.dates.len(), 10);
    assert_eq!(figure.dates.first(), Some(&(start() + chrono::Days::new(30))));
    assert_eq!(figure.data_index.len(), 10);
}

#[test]
fn gap_days_have_no_candle() {
    let mut points: Vec<PricePoint> = sample_series(5).points().to_vec();
    points.remove(2);
    let chart = StockChart::new(PriceSeries::new(points).unwrap());

    let figure = chart.build().unwrap();
    assert_eq!(figure.dates.len(), 5);
    assert_eq!(figure.candles.len(), 4);
    assert_eq!(figure.data_index.len(), 5);
}

#[test]
fn flat_days_count_as_down() {
    let figure = StockChart::new(sample_series(9)).build().unwrap();
    assert_eq!(figure.up_candles().count(), 3);
    assert_eq!(figure.down_candles().count(), 6);

    let flat = &figure.candles[2];
    assert_eq!(flat.direction, CandleDirection::Down);
    assert_eq!(flat.span, 0.0);
    assert_eq!(figure.body_color(flat.direction), &Color::red());
}

#[test]
fn candle_body_geometry() {
    let figure = StockChart::new(sample_series(1)).build().unwrap();
    let candle = &figure.candles[0];
    // open 100, close 101.5
    assert!((candle.mid - 100.75).abs() < 1e-9);
    assert!((candle.span - 1.5).abs() < 1e-9);
    assert_eq!(candle.wick, Some((102.5, 99.0)));
    assert_eq!(candle.width, 12.0 * 60.0 * 60.0 * 1000.0);
}

#[test]
fn look_and_feel_overrides_only_what_is_set() {
    let chart = StockChart::new(sample_series(3)).set_look_and_feel(&LookAndFeel::new().set_color_up("blue"));
    let style = chart.style();
    assert_eq!(style.up_color, Color::from("blue"));
    assert_eq!(style.down_color, Color::red());
    assert_eq!((style.width, style.height), (600, 400));

    let figure = chart.set_look_and_feel(&LookAndFeel::new().set_height(500)).build().unwrap();
    assert_eq!(figure.style.up_color, Color::from("blue"));
    assert_eq!(figure.hover_label.y, 450.0);
}

#[test]
fn last_setter_wins() {
    let chart = StockChart::new(sample_series(3))
        .set_title("first")
        .set_title("AAPL")
        .set_days(5)
        .set_days(2)
        .set_data(sample_series(8));
    assert_eq!(chart.title(), "AAPL");
    let figure = chart.build().unwrap();
    assert_eq!(figure.title, "AAPL");
    assert_eq!(figure.dates.len(), 2);
}

#[test]
fn invalid_indicator_is_skipped_and_recorded() {
    let figure = StockChart::new(sample_series(20))
        .add_indicator(IndicatorSpec::ema(5))
        .add_indicator(IndicatorSpec::bollinger(50))
        .add_indicator(IndicatorSpec::bollinger(5))
        .build()
        .unwrap();

    let labels: Vec<_> = figure.lines.iter().map(|l| l.label()).collect();
    assert_eq!(labels, vec!["EMA 5", "bbupper 5", "bblower 5"]);
    assert_eq!(
        figure.indicator_errors,
        vec![ChartError::InvalidParameter { kind: IndicatorKind::Bollinger, period: 50, len: 20 }]
    );
}

#[test]
fn indicators_run_on_the_displayed_window() {
    let figure = StockChart::new(sample_series(30))
        .set_days(8)
        .add_indicator(IndicatorSpec::ema(4))
        .build()
        .unwrap();
    let line = figure.line("EMA 4").unwrap();
    assert_eq!(line.series.len(), 8);
    assert_eq!(line.series.first_defined(), Some(3));
}

#[test]
fn zero_days_is_rejected() {
    let err = StockChart::new(sample_series(5)).set_days(0).build().unwrap_err();
    assert!(matches!(err, ChartError::InvalidInput(_)));
}

#[test]
fn empty_data_is_rejected() {
    let err = StockChart::new(PriceSeries::default()).build().unwrap_err();
    assert!(matches!(err, ChartError::InvalidInput(_)));
}

#[test]
fn build_leaves_builder_untouched() {
    let chart = StockChart::new(sample_series(10)).add_indicator(IndicatorSpec::ema(3));
    let first = chart.build().unwrap();
    let second = chart.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(chart.indicators().len(), 1);
}

#[test]
fn config_is_applied_on_top_of_the_builder() {
    let config = ChartConfig::from_json(
        r#"{
            "title": "MSFT",
            "days": 6,
            "look_and_feel": {"width": 800, "down_color": "orange"},
            "indicators": [{"kind": "bollinger", "period": 3}]
        }"#,
    )
    .unwrap();

    let figure = StockChart::new(sample_series(12))
        .add_indicator(IndicatorSpec::ema(2))
        .apply_config(&config)
        .build()
        .unwrap();

    assert_eq!(figure.title, "MSFT");
    assert_eq!(figure.dates.len(), 6);
    assert_eq!(figure.style.width, 800);
    assert_eq!(figure.style.down_color, Color::from("orange"));
    assert_eq!(figure.style.up_color, Color::green());
    assert_eq!(figure.lines.len(), 3);
    assert_eq!(figure.lines[0].label(), "EMA 2");
}

#[test]
fn figure_serializes_without_indicator_errors() {
    let figure = StockChart::new(sample_series(4))
        .add_indicator(IndicatorSpec::ema(9))
        .build()
        .unwrap();
    let json: serde_json::Value = serde_json::to_value(&figure).unwrap();
    assert!(json.get("indicator_errors").is_none());
    assert_eq!(json["axis"]["tools"], serde_json::json!(["xpan", "crosshair"]));
    assert_eq!(json["candles"][0]["direction"], "up");
}

#[quickcheck]
fn window_length_is_min_of_days_and_span(len: u8, days: u8) -> bool {
    let len = 1 + len as usize % 60;
    let days = 1 + days as usize % 120;
    let figure = StockChart::new(sample_series(len)).set_days(days).build().unwrap();
    figure.dates.len() == days.min(len) && figure.up_candles().count() + figure.down_candles().count() == figure.candles.len()
}
