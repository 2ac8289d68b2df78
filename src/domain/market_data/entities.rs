pub use super::value_objects::{Price, PricePoint};
use crate::domain::errors::{ChartError, ChartResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain entity - daily price series ordered by strictly increasing date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting duplicate or out-of-order dates
    pub fn new(points: Vec<PricePoint>) -> ChartResult<Self> {
        if let Some(pair) = points.windows(2).find(|pair| pair[1].date <= pair[0].date) {
            return Err(ChartError::invalid_input(format!(
                "dates must be strictly increasing: {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { points })
    }

    /// Sort by date first, then validate. Duplicates are still rejected.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> ChartResult<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.close.map(|c| c.value())).collect()
    }

    /// Most recent `days` entries, order preserved
    pub fn tail(&self, days: usize) -> PriceSeries {
        let start = self.points.len().saturating_sub(days);
        Self { points: self.points[start..].to_vec() }
    }

    /// Lowest low and highest high over the defined values
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for point in &self.points {
            for price in [point.low, point.high, point.open, point.close].into_iter().flatten() {
                let v = price.value();
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        range
    }
}

/// Derived series aligned one-to-one with the dates of a `PriceSeries`.
///
/// A value is `None` where the indicator's window is not yet defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl LineSeries {
    pub fn new(label: impl Into<String>, dates: impl IntoIterator<Item = NaiveDate>, values: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            points: dates.into_iter().zip(values).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    /// Index of the first defined value
    pub fn first_defined(&self) -> Option<usize> {
        self.points.iter().position(|(_, v)| v.is_some())
    }
}
