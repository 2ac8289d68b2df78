use chrono::NaiveDate;
use quickcheck_macros::quickcheck;
use stock_chart_wasm::domain::chart::{ChartFigure, ChartStyle, Color};
use stock_chart_wasm::domain::errors::ChartError;
use stock_chart_wasm::domain::market_data::indicator_engine::{bollinger_bands, ema, rolling_std};
use stock_chart_wasm::domain::market_data::{IndicatorKind, IndicatorSpec, PricePoint, PriceSeries};

fn closes_series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let points = closes
        .iter()
        .zip(start.iter_days())
        .map(|(&c, date)| PricePoint::new(date, c, c, c, c))
        .collect();
    PriceSeries::new(points).unwrap()
}

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

#[test]
fn ema_is_defined_from_the_nth_observation() {
    let values = ema(&defined(&[1.0, 2.0, 3.0, 4.0]), 3);
    assert_eq!(values[0], None);
    assert_eq!(values[1], None);
    // alpha = 0.5, weights 1, 0.5, 0.25 over 3, 2, 1
    assert!((values[2].unwrap() - 4.25 / 1.75).abs() < 1e-9);
    assert!(values[3].is_some());
}

#[test]
fn ema_of_constant_series_is_the_constant() {
    let values = ema(&defined(&[42.5; 10]), 5);
    assert!(values[..4].iter().all(Option::is_none));
    assert!(values[4..].iter().all(|v| (v.unwrap() - 42.5).abs() < 1e-9));
}

#[test]
fn rolling_std_is_sample_deviation() {
    let values = rolling_std(&defined(&[1.0, 2.0, 3.0, 10.0]), 3);
    assert_eq!(values[1], None);
    assert!((values[2].unwrap() - 1.0).abs() < 1e-9);
    // [2, 3, 10]: mean 5, squared deviations 9 + 4 + 25
    assert!((values[3].unwrap() - 19.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn bollinger_bands_sit_two_deviations_from_ema() {
    let closes = defined(&[1.0, 2.0, 3.0]);
    let (upper, lower) = bollinger_bands(&closes, 3);
    let center = 4.25 / 1.75;
    assert!((upper[2].unwrap() - (center + 2.0)).abs() < 1e-9);
    assert!((lower[2].unwrap() - (center - 2.0)).abs() < 1e-9);
}

#[test]
fn gaps_use_the_previous_close() {
    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let dates: Vec<NaiveDate> = start.iter_days().take(4).collect();
    let points = vec![
        PricePoint::new(dates[0], 5.0, 5.0, 5.0, 5.0),
        PricePoint::empty(dates[1]),
        PricePoint::new(dates[2], 5.0, 5.0, 5.0, 5.0),
        PricePoint::new(dates[3], 5.0, 5.0, 5.0, 5.0),
    ];
    let series = PriceSeries::new(points).unwrap();

    let lines = IndicatorSpec::ema(2).compute(&series).unwrap();
    let values: Vec<_> = lines[0].values().collect();
    assert_eq!(values[0], None);
    assert!(values[1..].iter().all(|v| (v.unwrap() - 5.0).abs() < 1e-9));
}

#[test]
fn labels_follow_kind_and_period() {
    assert_eq!(IndicatorSpec::ema(10).labels(), vec!["EMA 10"]);
    assert_eq!(IndicatorSpec::bollinger(20).labels(), vec!["bbupper 20", "bblower 20"]);
}

#[test]
fn period_longer_than_series_is_invalid() {
    let series = closes_series(&[1.0, 2.0, 3.0]);
    let err = IndicatorSpec::ema(5).compute(&series).unwrap_err();
    assert_eq!(err, ChartError::InvalidParameter { kind: IndicatorKind::Ema, period: 5, len: 3 });
    assert!(!err.is_fatal());

    assert!(IndicatorSpec::bollinger(0).compute(&series).is_err());
}

#[test]
fn default_line_styles() {
    let series = closes_series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut figure = ChartFigure::new("styles", ChartStyle::default());
    IndicatorSpec::ema(3).compute_and_render(&series, &mut figure).unwrap();
    IndicatorSpec::bollinger(3).compute_and_render(&series, &mut figure).unwrap();

    let ema = figure.line("EMA 3").unwrap();
    assert_eq!(ema.style.color, Color::black());
    assert_eq!(ema.style.dash, Some([4, 4]));
    assert!((ema.style.alpha - 0.7).abs() < 1e-9);

    assert_eq!(figure.line("bbupper 3").unwrap().style.color, Color::red());
    assert_eq!(figure.line("bblower 3").unwrap().style.color, Color::black());
    assert!(!figure.line("bbupper 3").unwrap().style.is_dashed());
}

#[test]
fn kind_parses_from_config_names() {
    assert_eq!("EMA".parse::<IndicatorKind>().unwrap(), IndicatorKind::Ema);
    assert_eq!("bb".parse::<IndicatorKind>().unwrap(), IndicatorKind::Bollinger);
    assert!("macd".parse::<IndicatorKind>().is_err());
}

#[quickcheck]
fn bands_enclose_the_center(raw: Vec<u16>, period: u8) -> bool {
    let closes: Vec<Option<f64>> = raw.iter().map(|&v| Some(1.0 + v as f64 / 100.0)).collect();
    let n = 2 + period as usize % 20;
    let center = ema(&closes, n);
    let (upper, lower) = bollinger_bands(&closes, n);

    (0..closes.len()).all(|i| match (lower[i], center[i], upper[i]) {
        (Some(lo), Some(c), Some(hi)) => lo <= c + 1e-9 && c <= hi + 1e-9,
        (None, _, None) => i + 1 < n,
        _ => false,
    })
}

#[quickcheck]
fn ema_length_matches_input(raw: Vec<u16>, period: u8) -> bool {
    let closes: Vec<Option<f64>> = raw.iter().map(|&v| Some(v as f64)).collect();
    let n = 1 + period as usize % 30;
    let values = ema(&closes, n);
    values.len() == closes.len() && values.iter().take(n - 1).all(Option::is_none)
}

#[test]
fn legend_lists_every_line_with_its_stroke() {
    let series = closes_series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut figure = ChartFigure::new("legend", ChartStyle::default());
    IndicatorSpec::ema(2).compute_and_render(&series, &mut figure).unwrap();
    IndicatorSpec::bollinger(4).compute_and_render(&series, &mut figure).unwrap();

    let legend: Vec<_> = figure
        .legend()
        .map(|(label, style)| (label.to_string(), style.color.clone(), style.dash))
        .collect();
    assert_eq!(
        legend,
        vec![
            ("EMA 2".to_string(), Color::black(), Some([4, 4])),
            ("bbupper 4".to_string(), Color::red(), None),
            ("bblower 4".to_string(), Color::black(), None),
        ]
    );
    assert!(figure.axis.has_tool("crosshair"));
    assert!(figure.axis.has_tool("xpan"));
}
