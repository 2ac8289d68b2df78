use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::market_data::{Price, PricePoint, PriceSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted date layouts, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// DTO for one row of a tabular price export (`Date,Open,High,Low,Close`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRowDto {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open", default)]
    pub open: Option<f64>,
    #[serde(rename = "High", default)]
    pub high: Option<f64>,
    #[serde(rename = "Low", default)]
    pub low: Option<f64>,
    #[serde(rename = "Close", default)]
    pub close: Option<f64>,
}

impl PriceRowDto {
    /// Convert the DTO into a domain price point
    pub fn to_domain_point(&self) -> ChartResult<PricePoint> {
        let date = parse_date(&self.date)?;
        let price = |v: Option<f64>| v.filter(|v| v.is_finite()).map(Price::from);
        Ok(PricePoint {
            date,
            open: price(self.open),
            high: price(self.high),
            low: price(self.low),
            close: price(self.close),
        })
    }
}

pub fn parse_date(raw: &str) -> ChartResult<NaiveDate> {
    let raw = raw.trim();
    // Timestamps such as "2024-01-02 00:00:00" keep only the date part
    let day = raw.split(['T', ' ']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
        .ok_or_else(|| ChartError::invalid_input(format!("unparseable date '{raw}'")))
}

/// Rows in any order into a validated series
pub fn rows_to_series(rows: &[PriceRowDto]) -> ChartResult<PriceSeries> {
    let points = rows.iter().map(PriceRowDto::to_domain_point).collect::<ChartResult<Vec<_>>>()?;
    PriceSeries::from_unsorted(points)
}

/// Parse a JSON array of rows into a validated series
pub fn series_from_json(json: &str) -> ChartResult<PriceSeries> {
    let rows: Vec<PriceRowDto> =
        serde_json::from_str(json).map_err(|e| ChartError::invalid_input(format!("price rows: {e}")))?;
    rows_to_series(&rows)
}
