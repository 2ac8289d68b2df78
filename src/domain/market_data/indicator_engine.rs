//! Technical indicators drawn over the candlesticks.
//!
//! Every indicator works on the forward-filled closing prices of the windowed
//! series and yields one or more [`LineSeries`] aligned with its dates.

use super::services::forward_fill;
use super::{LineSeries, PriceSeries};
use crate::domain::chart::{ChartFigure, Color, LineStyle, RenderedLine};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::{Display as StrumDisplay, EnumString};

/// Width of the Bollinger envelope in standard deviations
pub const BOLLINGER_WIDTH: f64 = 2.0;
/// Opacity shared by all indicator lines
pub const INDICATOR_ALPHA: f64 = 0.7;
/// Dash pattern (on, off) of the EMA line
pub const EMA_DASH: [u32; 2] = [4, 4];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    #[strum(to_string = "EMA", serialize = "ema")]
    Ema,
    #[strum(to_string = "Bollinger", serialize = "bollinger", serialize = "bb")]
    Bollinger,
}

/// Optional look overrides; unset fields fall back to the kind's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorStyle {
    pub color: Option<Color>,
    /// Lower band color for Bollinger; ignored by EMA
    pub secondary_color: Option<Color>,
    pub alpha: Option<f64>,
}

/// Indicator configuration as registered on a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub period: usize,
    #[serde(default)]
    pub style: IndicatorStyle,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, period: usize) -> Self {
        Self { kind, period, style: IndicatorStyle::default() }
    }

    pub fn ema(period: usize) -> Self {
        Self::new(IndicatorKind::Ema, period)
    }

    pub fn bollinger(period: usize) -> Self {
        Self::new(IndicatorKind::Bollinger, period)
    }

    pub fn with_style(mut self, style: IndicatorStyle) -> Self {
        self.style = style;
        self
    }

    /// Legend labels of the lines this indicator produces, in output order
    pub fn labels(&self) -> Vec<String> {
        match self.kind {
            IndicatorKind::Ema => vec![format!("EMA {}", self.period)],
            IndicatorKind::Bollinger => vec![
                format!("bbupper {}", self.period),
                format!("bblower {}", self.period),
            ],
        }
    }

    /// Fail fast on a period the series cannot support
    pub fn validate(&self, len: usize) -> ChartResult<()> {
        if self.period == 0 || self.period > len {
            return Err(ChartError::InvalidParameter { kind: self.kind, period: self.period, len });
        }
        Ok(())
    }

    /// Compute the indicator lines for `series`
    pub fn compute(&self, series: &PriceSeries) -> ChartResult<Vec<LineSeries>> {
        self.validate(series.len())?;

        let closes = forward_fill(&series.closes());
        let n = self.period;

        let values = match self.kind {
            IndicatorKind::Ema => vec![ema(&closes, n)],
            IndicatorKind::Bollinger => {
                let (upper, lower) = bollinger_bands(&closes, n);
                vec![upper, lower]
            }
        };
        let lines: Vec<LineSeries> = self
            .labels()
            .into_iter()
            .zip(values)
            .map(|(label, values)| LineSeries::new(label, series.dates(), values))
            .collect();

        log_debug!(
            LogComponent::Domain("IndicatorEngine"),
            "{} {} computed over {} points",
            self.kind,
            n,
            series.len()
        );

        Ok(lines)
    }

    /// Compute the lines and append them, styled, to the figure
    pub fn compute_and_render(&self, series: &PriceSeries, figure: &mut ChartFigure) -> ChartResult<()> {
        let styles = self.line_styles();
        for (line, style) in self.compute(series)?.into_iter().zip(styles) {
            figure.lines.push(RenderedLine::new(line, style));
        }
        Ok(())
    }

    fn line_styles(&self) -> Vec<LineStyle> {
        let alpha = self.style.alpha.unwrap_or(INDICATOR_ALPHA);
        match self.kind {
            IndicatorKind::Ema => {
                let color = self.style.color.clone().unwrap_or_else(Color::black);
                vec![LineStyle::dashed(color, EMA_DASH).with_alpha(alpha)]
            }
            IndicatorKind::Bollinger => {
                let upper = self.style.color.clone().unwrap_or_else(Color::red);
                let lower = self.style.secondary_color.clone().unwrap_or_else(Color::black);
                vec![
                    LineStyle::solid(upper).with_alpha(alpha),
                    LineStyle::solid(lower).with_alpha(alpha),
                ]
            }
        }
    }
}

/// Adjusted exponentially weighted mean with span `period`.
///
/// Weights are `(1 - alpha)^i` for the i-th most recent observation,
/// normalized by their sum, with `alpha = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct EmaAccumulator {
    decay: f64,
    numerator: f64,
    denominator: f64,
    observations: usize,
    min_periods: usize,
}

impl EmaAccumulator {
    pub fn new(period: usize) -> Self {
        let alpha = 2.0 / (period as f64 + 1.0);
        Self {
            decay: 1.0 - alpha,
            numerator: 0.0,
            denominator: 0.0,
            observations: 0,
            min_periods: period.max(1),
        }
    }

    /// Feed one observation; returns the average once enough were seen
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.numerator = value + self.decay * self.numerator;
        self.denominator = 1.0 + self.decay * self.denominator;
        self.observations += 1;
        (self.observations >= self.min_periods).then(|| self.numerator / self.denominator)
    }
}

/// Trailing window of exactly `period` observations with a sample deviation.
///
/// Mean and squared-deviation sum slide with a Welford update and are
/// recomputed from the window once per `period` pushes, so rounding error
/// cannot build up across a long series.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    window: VecDeque<f64>,
    mean: f64,
    m2: f64,
    since_resync: usize,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            mean: 0.0,
            m2: 0.0,
            since_resync: 0,
        }
    }

    /// Feed one observation; returns the sample standard deviation once the
    /// window holds `period` values. Undefined for a period of one.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.window.push_back(value);
        if self.window.len() > self.period
            && let Some(old) = self.window.pop_front()
        {
            let n = self.period as f64;
            let mean = self.mean + (value - old) / n;
            self.m2 += (value - old) * (value - mean + old - self.mean);
            self.mean = mean;
        } else {
            let n = self.window.len() as f64;
            let delta = value - self.mean;
            self.mean += delta / n;
            self.m2 += delta * (value - self.mean);
        }

        self.since_resync += 1;
        if self.since_resync >= self.period {
            self.resync();
        }

        if self.window.len() < self.period || self.period < 2 {
            return None;
        }
        Some((self.m2.max(0.0) / (self.period as f64 - 1.0)).sqrt())
    }

    /// Two-pass recomputation over the current window
    fn resync(&mut self) {
        let n = self.window.len() as f64;
        self.mean = self.window.iter().sum::<f64>() / n;
        self.m2 = self.window.iter().map(|v| (v - self.mean).powi(2)).sum();
        self.since_resync = 0;
    }
}

/// EMA over a forward-filled series. Leading absent values are skipped and
/// stay absent; the first value appears at the `period`-th observation.
pub fn ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut acc = EmaAccumulator::new(period);
    values.iter().map(|v| v.and_then(|x| acc.push(x))).collect()
}

/// Trailing sample standard deviation over exactly `period` observations
pub fn rolling_std(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut window = RollingWindow::new(period);
    values.iter().map(|v| v.and_then(|x| window.push(x))).collect()
}

/// Upper and lower Bollinger bands around EMA(`period`)
pub fn bollinger_bands(values: &[Option<f64>], period: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let center = ema(values, period);
    let deviation = rolling_std(values, period);
    center
        .iter()
        .zip(&deviation)
        .map(|(c, s)| match (c, s) {
            (Some(c), Some(s)) => (Some(c + BOLLINGER_WIDTH * s), Some(c - BOLLINGER_WIDTH * s)),
            _ => (None, None),
        })
        .unzip()
}
