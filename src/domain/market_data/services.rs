use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{PricePoint, PriceSeries};
use crate::log_debug;

/// Domain service filling calendar gaps in a daily series
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarNormalizer;

impl CalendarNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce a series with one entry for every day between the first and
    /// last date, inclusive. Days missing from the input carry no prices.
    pub fn normalize(&self, series: &PriceSeries) -> ChartResult<PriceSeries> {
        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return Err(ChartError::invalid_input("price series is empty"));
        };

        let span = (last - first).num_days() as usize + 1;
        let mut points = Vec::with_capacity(span);
        let mut source = series.points().iter().peekable();

        for day in first.iter_days().take(span) {
            match source.next_if(|p| p.date == day) {
                Some(point) => points.push(*point),
                None => points.push(PricePoint::empty(day)),
            }
        }

        log_debug!(
            LogComponent::Domain("CalendarNormalizer"),
            "normalized {} rows into {} calendar days ({} inserted)",
            series.len(),
            points.len(),
            points.len() - series.len()
        );

        PriceSeries::new(points)
    }
}

/// Free-function form of [`CalendarNormalizer::normalize`]
pub fn normalize_calendar(series: &PriceSeries) -> ChartResult<PriceSeries> {
    CalendarNormalizer::new().normalize(series)
}

/// Replace each absent value with the most recent defined one.
/// A leading run of absent values stays absent.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}
