use chrono::NaiveDate;
use derive_more::{Constructor, Deref, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Value Object - price of a single OHLC field
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Rounded to two decimals, as shown in tooltips
    pub fn rounded(&self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - one trading day.
///
/// Missing fields are `None`, never zero: a calendar day inserted by
/// normalization has no prices at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: Option<Price>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    pub close: Option<Price>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open: Some(Price::from(open)),
            high: Some(Price::from(high)),
            low: Some(Price::from(low)),
            close: Some(Price::from(close)),
        }
    }

    /// Placeholder for a calendar day without trading data
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, open: None, high: None, low: None, close: None }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_none() && self.high.is_none() && self.low.is_none() && self.close.is_none()
    }
}
