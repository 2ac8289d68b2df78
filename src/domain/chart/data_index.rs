//! Date-keyed OHLC snapshot backing the hover readout.
//!
//! Keys use the same day-resolution `%m/%d/%y` format as the pointer
//! conversion; a key produced on one side and not the other makes the hover
//! show nothing, so both go through [`date_key`].

use crate::domain::market_data::{Price, PriceSeries};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DATE_KEY_FORMAT: &str = "%m/%d/%y";
pub const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Prices shown for one day, rounded to cents. Missing values read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OhlcSnapshot {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcSnapshot {
    fn from_prices(open: Option<Price>, high: Option<Price>, low: Option<Price>, close: Option<Price>) -> Self {
        let cents = |p: Option<Price>| p.map(|p| p.rounded()).unwrap_or(0.0);
        Self {
            open: cents(open),
            high: cents(high),
            low: cents(low),
            close: cents(close),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartDataIndex {
    entries: BTreeMap<String, OhlcSnapshot>,
}

impl ChartDataIndex {
    pub fn build(series: &PriceSeries) -> Self {
        let entries = series
            .points()
            .iter()
            .map(|p| (date_key(p.date), OhlcSnapshot::from_prices(p.open, p.high, p.low, p.close)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, key: &str) -> Option<&OhlcSnapshot> {
        self.entries.get(key)
    }

    pub fn lookup_date(&self, date: NaiveDate) -> Option<&OhlcSnapshot> {
        self.lookup(&date_key(date))
    }

    /// Readout for a pointer at time `x_ms`, or `None` off the data
    pub fn hover_text(&self, x_ms: f64) -> Option<String> {
        let key = pointer_to_date_key(x_ms)?;
        let snap = self.lookup(&key)?;
        Some(format!(
            "{} open:{} close:{} high:{} low:{}",
            key, snap.open, snap.close, snap.high, snap.low
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OhlcSnapshot)> {
        self.entries.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Milliseconds since the epoch of the date's midnight, the chart's x value
pub fn date_to_ms(date: NaiveDate) -> f64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis() as f64
}

/// Date whose candle is nearest to the pointer.
///
/// Candles sit on midnight, so the day flips halfway between two of them.
pub fn pointer_to_date(x_ms: f64) -> Option<NaiveDate> {
    if !x_ms.is_finite() {
        return None;
    }
    let day = ((x_ms + DAY_MS / 2.0) / DAY_MS).floor();
    let millis = day * DAY_MS;
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
}

pub fn pointer_to_date_key(x_ms: f64) -> Option<String> {
    pointer_to_date(x_ms).map(date_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_month_day_short_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_key(date), "03/07/24");
    }

    #[test]
    fn pointer_snaps_to_nearest_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let x = date_to_ms(date);
        assert_eq!(pointer_to_date(x), Some(date));
        assert_eq!(pointer_to_date(x + DAY_MS * 0.49), Some(date));
        assert_eq!(pointer_to_date(x - DAY_MS * 0.49), Some(date));
        assert_eq!(pointer_to_date(x + DAY_MS * 0.51), date.succ_opt());
    }

    #[test]
    fn pointer_rejects_non_finite() {
        assert_eq!(pointer_to_date(f64::NAN), None);
        assert_eq!(pointer_to_date(f64::INFINITY), None);
    }
}
