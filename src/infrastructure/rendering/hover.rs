use super::{CanvasRenderer, PlotArea};
use crate::domain::chart::{ChartDataIndex, ChartFigure, HoverLabel, Viewport};
use crate::domain::errors::ChartResult;
use crate::domain::logging::LogComponent;
use crate::log_trace;

/// Pointer-hover behaviour over a built chart.
///
/// Holds a static copy of the figure's data index; the index is never
/// refreshed after the chart is built.
#[derive(Debug, Clone)]
pub struct HoverController {
    plot: PlotArea,
    viewport: Viewport,
    index: ChartDataIndex,
    label: HoverLabel,
    crosshair_enabled: bool,
    /// Canvas position of the crosshair while the pointer is over the plot
    crosshair: Option<(f64, f64)>,
}

impl HoverController {
    pub fn new(figure: &ChartFigure) -> Self {
        let plot = PlotArea::for_canvas(figure.style.width, figure.style.height);
        Self {
            viewport: plot.viewport_for(figure),
            plot,
            index: figure.data_index.clone(),
            label: figure.hover_label.clone(),
            crosshair_enabled: figure.axis.has_tool("crosshair"),
            crosshair: None,
        }
    }

    pub fn plot(&self) -> &PlotArea {
        &self.plot
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn label(&self) -> &HoverLabel {
        &self.label
    }

    pub fn crosshair(&self) -> Option<(f64, f64)> {
        self.crosshair
    }

    /// Shift the visible window by a fraction of its width (`xpan`)
    pub fn pan_x(&mut self, delta_fraction: f64) {
        self.viewport.pan_x(delta_fraction);
    }

    /// Pan by a pointer drag of `delta_px` pixels
    pub fn drag(&mut self, delta_px: f64) {
        if self.plot.width > 0.0 {
            self.pan_x(-delta_px / self.plot.width);
        }
    }

    /// Update the label and crosshair for a canvas-relative pointer.
    ///
    /// Returns the new text; the label is cleared when the pointer is off the
    /// plot or on a date the index does not know.
    pub fn on_pointer_move(&mut self, pointer_x: f64, pointer_y: f64) -> Option<&str> {
        self.crosshair = (self.crosshair_enabled && self.plot.contains(pointer_x, pointer_y))
            .then_some((pointer_x, pointer_y));

        let text = self
            .plot
            .pointer_to_time(&self.viewport, pointer_x)
            .and_then(|time| self.index.hover_text(time));

        log_trace!(LogComponent::Infrastructure("Hover"), "pointer {:.1}px -> {:?}", pointer_x, text);

        self.label.text = text.unwrap_or_default();
        (!self.label.text.is_empty()).then_some(self.label.text.as_str())
    }

    pub fn on_pointer_leave(&mut self) {
        self.label.text.clear();
        self.crosshair = None;
    }

    /// Paint the crosshair guides and the label at its fixed anchor
    pub fn render_label(&self, renderer: &CanvasRenderer) -> ChartResult<()> {
        if let Some((x, y)) = self.crosshair {
            renderer.draw_crosshair(&self.plot, x, y);
        }
        renderer.draw_hover_label(&self.label)
    }
}
