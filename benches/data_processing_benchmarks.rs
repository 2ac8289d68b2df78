use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use stock_chart_wasm::StockChart;
use stock_chart_wasm::domain::chart::ChartDataIndex;
use stock_chart_wasm::domain::market_data::indicator_engine::{bollinger_bands, ema};
use stock_chart_wasm::domain::market_data::{CalendarNormalizer, IndicatorSpec, PricePoint, PriceSeries, forward_fill};

/// Daily series with weekends left out, so normalization has gaps to fill
fn generate_trading_days(count: usize) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let mut base_price = 150.0;
    let points = start
        .iter_days()
        .enumerate()
        .filter(|(i, _)| i % 7 < 5)
        .take(count)
        .map(|(i, date)| {
            let trend = (i as f64 * 0.01).sin() * 10.0;
            let noise = ((i as f64 * 0.5).sin() + (i as f64 * 1.2).cos()) * 1.5;
            let open = base_price + trend + noise;
            let close = open + (i as f64 * 0.3).cos() * 2.0;
            let high = open.max(close) + (i as f64 * 0.7).sin().abs() * 1.5;
            let low = open.min(close) - (i as f64 * 0.9).cos().abs() * 1.2;
            base_price = close * 0.999 + open * 0.001;
            PricePoint::new(date, open, high, low, close)
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar_normalization");
    let normalizer = CalendarNormalizer::new();

    for count in [250, 2_500, 25_000] {
        let series = generate_trading_days(count);
        group.bench_with_input(BenchmarkId::new("normalize", count), &series, |b, series| {
            b.iter(|| normalizer.normalize(black_box(series)).unwrap())
        });
    }
    group.finish();
}

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    group.measurement_time(Duration::from_secs(5));

    for count in [1_000, 10_000, 100_000] {
        let series = CalendarNormalizer::new().normalize(&generate_trading_days(count)).unwrap();
        let closes = forward_fill(&series.closes());

        group.bench_with_input(BenchmarkId::new("ema_20", count), &closes, |b, closes| {
            b.iter(|| ema(black_box(closes), 20))
        });
        group.bench_with_input(BenchmarkId::new("bollinger_20", count), &closes, |b, closes| {
            b.iter(|| bollinger_bands(black_box(closes), 20))
        });
        group.bench_with_input(BenchmarkId::new("data_index", count), &series, |b, series| {
            b.iter(|| ChartDataIndex::build(black_box(series)))
        });
    }
    group.finish();
}

fn bench_chart_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_build");

    for days in [100, 1_000] {
        let chart = StockChart::new(generate_trading_days(5_000))
            .set_days(days)
            .add_indicator(IndicatorSpec::ema(12))
            .add_indicator(IndicatorSpec::ema(26))
            .add_indicator(IndicatorSpec::bollinger(20));
        group.bench_with_input(BenchmarkId::new("build", days), &chart, |b, chart| {
            b.iter(|| chart.build().unwrap())
        });
    }
    group.finish();
}

criterion_group!(data_benches, bench_normalization, bench_indicators, bench_chart_build);
criterion_main!(data_benches);
