use super::stock_chart::StockChart;
use crate::domain::{
    chart::LookAndFeel,
    errors::{ChartError, ChartResult},
    market_data::IndicatorSpec,
};
use serde::{Deserialize, Serialize};

/// Serializable chart configuration.
///
/// Every field is optional; applying it onto a [`StockChart`] only touches
/// what is set, and indicators are appended after those already registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub title: Option<String>,
    pub days: Option<usize>,
    pub look_and_feel: Option<LookAndFeel>,
    pub indicators: Vec<IndicatorSpec>,
}

impl ChartConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json).map_err(|e| ChartError::invalid_input(format!("chart config: {e}")))
    }
}

impl StockChart {
    pub fn apply_config(self, config: &ChartConfig) -> Self {
        let mut chart = self;
        if let Some(title) = &config.title {
            chart = chart.set_title(title.clone());
        }
        if let Some(days) = config.days {
            chart = chart.set_days(days);
        }
        if let Some(look_and_feel) = &config.look_and_feel {
            chart = chart.set_look_and_feel(look_and_feel);
        }
        config
            .indicators
            .iter()
            .cloned()
            .fold(chart, StockChart::add_indicator)
    }
}
