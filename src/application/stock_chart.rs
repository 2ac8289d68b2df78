use crate::domain::{
    chart::{CandleGeometry, ChartDataIndex, ChartFigure, ChartStyle, LookAndFeel},
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::{CalendarNormalizer, IndicatorSpec, PriceSeries},
};
use crate::{log_error, log_info, log_warn};

/// Number of trailing calendar days shown when none is configured
pub const DEFAULT_DAYS: usize = 100;

/// Candlestick chart composer.
///
/// Setters follow last-write-wins; `build` runs the whole preparation
/// pipeline and never mutates the builder.
#[derive(Debug, Clone)]
pub struct StockChart {
    title: String,
    data: PriceSeries,
    days: usize,
    style: ChartStyle,
    indicators: Vec<IndicatorSpec>,
}

impl StockChart {
    pub fn new(data: PriceSeries) -> Self {
        Self {
            title: String::new(),
            data,
            days: DEFAULT_DAYS,
            style: ChartStyle::default(),
            indicators: Vec::new(),
        }
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn set_data(mut self, data: PriceSeries) -> Self {
        self.data = data;
        self
    }

    pub fn set_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn add_indicator(mut self, indicator: IndicatorSpec) -> Self {
        self.indicators.push(indicator);
        self
    }

    pub fn set_look_and_feel(mut self, look_and_feel: &LookAndFeel) -> Self {
        self.style.merge(look_and_feel);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn indicators(&self) -> &[IndicatorSpec] {
        &self.indicators
    }

    /// Normalized, truncated series the figure is drawn from
    pub fn windowed_series(&self) -> ChartResult<PriceSeries> {
        if self.days == 0 {
            return Err(ChartError::invalid_input("display window must be at least one day"));
        }
        let normalized = CalendarNormalizer::new().normalize(&self.data)?;
        Ok(normalized.tail(self.days))
    }

    /// Assemble the chart: calendar, window, candles, indicators, hover index.
    ///
    /// Input problems abort the build. A bad indicator is skipped, logged and
    /// recorded in [`ChartFigure::indicator_errors`].
    pub fn build(&self) -> ChartResult<ChartFigure> {
        let window = self.windowed_series()?;

        let mut figure = ChartFigure::new(self.title.clone(), self.style.clone());
        figure.dates = window.dates().collect();
        figure.candles = window.points().iter().filter_map(CandleGeometry::from_point).collect();

        for indicator in &self.indicators {
            match indicator.compute_and_render(&window, &mut figure) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => {
                    log_error!(
                        LogComponent::Application("StockChart"),
                        "{} {} aborted the build: {}",
                        indicator.kind,
                        indicator.period,
                        err
                    );
                    return Err(err);
                }
                Err(err) => {
                    log_warn!(
                        LogComponent::Application("StockChart"),
                        "skipping {} {}: {}",
                        indicator.kind,
                        indicator.period,
                        err
                    );
                    figure.indicator_errors.push(err);
                }
            }
        }

        figure.data_index = ChartDataIndex::build(&window);

        log_info!(
            LogComponent::Application("StockChart"),
            "built '{}': {} days, {} candles ({} up), {} lines, {} indicator errors",
            figure.title,
            figure.dates.len(),
            figure.candles.len(),
            figure.up_candles().count(),
            figure.lines.len(),
            figure.indicator_errors.len()
        );

        Ok(figure)
    }
}
