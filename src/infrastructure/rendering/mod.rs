//! Rendering collaborator: turns a prepared [`ChartFigure`] into pixels.
//!
//! The figure is computed once; renderers only map its time/price values onto
//! the plot area and never modify it.

pub mod canvas_renderer;
pub mod hover;

pub use canvas_renderer::CanvasRenderer;
pub use hover::HoverController;

use crate::domain::chart::{ChartFigure, Viewport};
use crate::domain::errors::ChartResult;

pub trait ChartRenderer {
    fn draw(&mut self, figure: &ChartFigure) -> ChartResult<()>;
}

/// Pixel rectangle of the plot inside the canvas.
///
/// The margins leave room for the title above and the slanted date labels
/// below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub const MARGIN_LEFT: f64 = 60.0;
    pub const MARGIN_RIGHT: f64 = 20.0;
    pub const MARGIN_TOP: f64 = 30.0;
    pub const MARGIN_BOTTOM: f64 = 60.0;

    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            left: Self::MARGIN_LEFT,
            top: Self::MARGIN_TOP,
            width: (width as f64 - Self::MARGIN_LEFT - Self::MARGIN_RIGHT).max(1.0),
            height: (height as f64 - Self::MARGIN_TOP - Self::MARGIN_BOTTOM).max(1.0),
        }
    }

    /// Viewport framing `figure` inside this area
    pub fn viewport_for(&self, figure: &ChartFigure) -> Viewport {
        let fitted = figure.fit_viewport();
        Viewport {
            width: self.width.round() as u32,
            height: self.height.round() as u32,
            ..fitted
        }
    }

    pub fn to_screen(&self, viewport: &Viewport, time: f64, price: f64) -> (f64, f64) {
        (self.left + viewport.time_to_x(time), self.top + viewport.price_to_y(price))
    }

    /// Time under a canvas-relative pointer x, `None` outside the plot
    pub fn pointer_to_time(&self, viewport: &Viewport, pointer_x: f64) -> Option<f64> {
        let x = pointer_x - self.left;
        (0.0..=self.width).contains(&x).then(|| viewport.x_to_time(x))
    }

    /// Horizontal pixels per millisecond
    pub fn time_scale(&self, viewport: &Viewport) -> f64 {
        let range = viewport.time_range();
        if range == 0.0 { 0.0 } else { viewport.width as f64 / range }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}
