use super::data_index::{ChartDataIndex, date_to_ms};
use super::value_objects::{ChartStyle, Color, LineStyle, Viewport};
use crate::domain::errors::ChartError;
use crate::domain::market_data::{LineSeries, PricePoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use strum::Display as StrumDisplay;

/// Width of a candle body on the time axis: half a day in milliseconds
pub const HALF_DAY_MS: f64 = 12.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CandleDirection {
    Up,
    Down,
}

impl CandleDirection {
    /// `close > open` is up; unchanged days count as down
    pub fn classify(open: f64, close: f64) -> Self {
        if close > open { Self::Up } else { Self::Down }
    }
}

/// Geometry of one candlestick: body rectangle plus high-low wick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub date: NaiveDate,
    /// Time of the candle center, ms since the epoch
    pub x: f64,
    pub mid: f64,
    pub span: f64,
    pub width: f64,
    pub direction: CandleDirection,
    /// (high, low) when both are known
    pub wick: Option<(f64, f64)>,
}

impl CandleGeometry {
    /// `None` for days without an open or close, i.e. calendar filler
    pub fn from_point(point: &PricePoint) -> Option<Self> {
        let open = point.open?.value();
        let close = point.close?.value();
        let wick = point.high.zip(point.low).map(|(h, l)| (h.value(), l.value()));
        Some(Self {
            date: point.date,
            x: date_to_ms(point.date),
            mid: (open + close) / 2.0,
            span: (close - open).abs(),
            width: HALF_DAY_MS,
            direction: CandleDirection::classify(open, close),
            wick,
        })
    }

    pub fn top(&self) -> f64 {
        self.mid + self.span / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.mid - self.span / 2.0
    }
}

/// Indicator line ready to be stroked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedLine {
    pub series: LineSeries,
    pub style: LineStyle,
}

impl RenderedLine {
    pub fn new(series: LineSeries, style: LineStyle) -> Self {
        Self { series, style }
    }

    pub fn label(&self) -> &str {
        &self.series.label
    }

    /// Runs of consecutive defined points as (x ms, value); gaps split runs
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (date, value) in &self.series.points {
            match value {
                Some(v) => current.push((date_to_ms(*date), *v)),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

/// Fixed-position text box that shows the hover readout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverLabel {
    /// Screen pixels from the left edge
    pub x: f64,
    /// Screen pixels from the bottom edge
    pub y: f64,
    pub text: String,
    pub background: Color,
    pub border: Color,
}

impl HoverLabel {
    pub fn for_height(height: u32) -> Self {
        Self {
            x: 30.0,
            y: height as f64 - 50.0,
            text: String::new(),
            background: Color::white(),
            border: Color::white(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSettings {
    /// Rotation of the date tick labels, radians
    pub label_orientation: f64,
    pub grid_alpha: f64,
    pub tools: Vec<String>,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            label_orientation: FRAC_PI_4,
            grid_alpha: 0.3,
            tools: vec!["xpan".to_string(), "crosshair".to_string()],
        }
    }
}

impl AxisSettings {
    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }
}

/// Domain entity - fully prepared chart handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFigure {
    pub title: String,
    pub style: ChartStyle,
    pub axis: AxisSettings,
    pub candles: Vec<CandleGeometry>,
    pub lines: Vec<RenderedLine>,
    pub hover_label: HoverLabel,
    pub data_index: ChartDataIndex,
    /// Dates of the displayed window, oldest first
    pub dates: Vec<NaiveDate>,
    /// Indicators dropped during the build, in registration order
    #[serde(skip)]
    pub indicator_errors: Vec<ChartError>,
}

impl ChartFigure {
    pub fn new(title: impl Into<String>, style: ChartStyle) -> Self {
        let hover_label = HoverLabel::for_height(style.height);
        Self {
            title: title.into(),
            style,
            axis: AxisSettings::default(),
            candles: Vec::new(),
            lines: Vec::new(),
            hover_label,
            data_index: ChartDataIndex::default(),
            dates: Vec::new(),
            indicator_errors: Vec::new(),
        }
    }

    pub fn up_candles(&self) -> impl Iterator<Item = &CandleGeometry> {
        self.candles.iter().filter(|c| c.direction == CandleDirection::Up)
    }

    pub fn down_candles(&self) -> impl Iterator<Item = &CandleGeometry> {
        self.candles.iter().filter(|c| c.direction == CandleDirection::Down)
    }

    pub fn line(&self, label: &str) -> Option<&RenderedLine> {
        self.lines.iter().find(|l| l.label() == label)
    }

    /// Legend rows in drawing order: each line's label with its stroke
    pub fn legend(&self) -> impl Iterator<Item = (&str, &LineStyle)> {
        self.lines.iter().map(|l| (l.label(), &l.style))
    }

    pub fn body_color(&self, direction: CandleDirection) -> &Color {
        match direction {
            CandleDirection::Up => &self.style.up_color,
            CandleDirection::Down => &self.style.down_color,
        }
    }

    /// Time window of the displayed dates, padded by half a day on each side
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        let first = date_to_ms(*self.dates.first()?);
        let last = date_to_ms(*self.dates.last()?);
        Some((first - HALF_DAY_MS, last + HALF_DAY_MS))
    }

    /// Price span over candles and defined indicator values
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let candle_prices = self.candles.iter().flat_map(|c| {
            let (hi, lo) = c.wick.unwrap_or((c.top(), c.bottom()));
            [hi, lo, c.top(), c.bottom()]
        });
        let line_prices = self.lines.iter().flat_map(|l| l.series.values().flatten());
        candle_prices.chain(line_prices).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
    }

    /// Viewport framing the whole figure with 5% vertical padding
    pub fn fit_viewport(&self) -> Viewport {
        let mut viewport = Viewport::new(self.style.width, self.style.height);
        if let Some((start, end)) = self.time_bounds() {
            viewport.start_time = start;
            viewport.end_time = end;
        }
        if let Some((lo, hi)) = self.price_bounds() {
            let padding = if hi > lo { (hi - lo) * 0.05 } else { hi.abs().max(1.0) * 0.05 };
            viewport.min_price = lo - padding;
            viewport.max_price = hi + padding;
        }
        viewport
    }
}
