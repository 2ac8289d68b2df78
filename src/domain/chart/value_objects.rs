use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Value Object - CSS color understood by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn green() -> Self {
        Self::new("Green")
    }

    pub fn red() -> Self {
        Self::new("Red")
    }

    pub fn black() -> Self {
        Self::new("black")
    }

    pub fn white() -> Self {
        Self::new("white")
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Resolved look of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub up_color: Color,
    pub down_color: Color,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            up_color: Color::green(),
            down_color: Color::red(),
        }
    }
}

impl ChartStyle {
    /// Apply the set fields of `overrides`, keeping the rest
    pub fn merge(&mut self, overrides: &LookAndFeel) {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(color) = &overrides.up_color {
            self.up_color = color.clone();
        }
        if let Some(color) = &overrides.down_color {
            self.down_color = color.clone();
        }
    }
}

/// Partial style overrides; only `Some` fields take effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAndFeel {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub up_color: Option<Color>,
    pub down_color: Option<Color>,
}

impl LookAndFeel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn set_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn set_color_up(mut self, color: impl Into<Color>) -> Self {
        self.up_color = Some(color.into());
        self
    }

    pub fn set_color_down(mut self, color: impl Into<Color>) -> Self {
        self.down_color = Some(color.into());
        self
    }
}

/// Stroke of an indicator line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub alpha: f64,
    /// (on, off) dash lengths in pixels; `None` for a solid line
    pub dash: Option<[u32; 2]>,
    pub width: f64,
}

impl LineStyle {
    pub fn solid(color: Color) -> Self {
        Self { color, alpha: 1.0, dash: None, width: 1.0 }
    }

    pub fn dashed(color: Color, dash: [u32; 2]) -> Self {
        Self { dash: Some(dash), ..Self::solid(color) }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha: alpha.clamp(0.0, 1.0), ..self }
    }

    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

/// Value Object - visible data window mapped onto the plot area.
///
/// Time is in milliseconds since the Unix epoch, matching the x values of the
/// chart geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub start_time: f64,
    pub end_time: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: 0.0,
            min_price: 0.0,
            max_price: 100.0,
            width: 600,
            height: 400,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn time_range(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn price_range(&self) -> f64 {
        self.max_price - self.min_price
    }

    /// Horizontal pan by a fraction of the visible time range (`xpan` tool).
    /// Prices stay put.
    pub fn pan_x(&mut self, delta_x: f64) {
        let time_delta = self.time_range() * delta_x;
        self.start_time += time_delta;
        self.end_time += time_delta;
    }

    pub fn time_to_x(&self, timestamp: f64) -> f64 {
        if self.time_range() == 0.0 {
            return self.width as f64 / 2.0;
        }
        let normalized = (timestamp - self.start_time) / self.time_range();
        normalized * self.width as f64
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        if self.price_range() == 0.0 {
            return self.height as f64 / 2.0;
        }
        let normalized = (price - self.min_price) / self.price_range();
        self.height as f64 * (1.0 - normalized)
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        if self.width == 0 {
            return self.start_time;
        }
        let normalized = x / self.width as f64;
        self.start_time + self.time_range() * normalized
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        if self.height == 0 {
            return self.min_price;
        }
        let normalized = 1.0 - (y / self.height as f64);
        self.min_price + self.price_range() * normalized
    }
}
