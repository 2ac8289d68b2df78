use super::{ChartRenderer, PlotArea};
use crate::domain::chart::{ChartFigure, HoverLabel, LineStyle, RenderedLine, Viewport, date_to_ms};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "white";
const AXIS_COLOR: &str = "#444444";
const GRID_COLOR: &str = "gray";
const OUTLINE_COLOR: &str = "black";
const FONT: &str = "11px sans-serif";
const TITLE_FONT: &str = "bold 13px sans-serif";
const CROSSHAIR_COLOR: &str = "gray";
const LEGEND_ROW: f64 = 16.0;
const LEGEND_SAMPLE: f64 = 24.0;
const PRICE_TICKS: usize = 5;
const MAX_DATE_LABELS: usize = 10;

fn js_error(action: &'static str) -> impl Fn(JsValue) -> ChartError {
    move |err| ChartError::Rendering(format!("{action}: {err:?}"))
}

/// Canvas 2D renderer for a prepared chart figure
pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    /// Panned window; `None` frames the whole figure
    viewport: Option<Viewport>,
}

impl CanvasRenderer {
    pub fn new(context: CanvasRenderingContext2d, width: u32, height: u32) -> Self {
        Self { context, width, height, viewport: None }
    }

    /// Look up `canvas_id` in the current document and size it to the chart
    pub fn from_canvas_id(canvas_id: &str, width: u32, height: u32) -> ChartResult<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ChartError::Rendering("no document available".to_string()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| ChartError::Rendering(format!("canvas '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ChartError::Rendering(format!("'{canvas_id}' is not a canvas")))?;

        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .map_err(js_error("get 2d context"))?
            .ok_or_else(|| ChartError::Rendering("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ChartError::Rendering("failed to cast to 2d context".to_string()))?;

        Ok(Self::new(context, width, height))
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    pub fn plot_area(&self) -> PlotArea {
        PlotArea::for_canvas(self.width, self.height)
    }

    /// Draw the hover readout box at its fixed anchor
    pub fn draw_hover_label(&self, label: &HoverLabel) -> ChartResult<()> {
        if label.text.is_empty() {
            return Ok(());
        }
        let ctx = &self.context;
        ctx.set_font(FONT);
        let text_width = ctx.measure_text(&label.text).map_err(js_error("measure hover text"))?.width();
        // Anchor is measured from the bottom edge
        let baseline = self.height as f64 - label.y;

        set_fill(ctx, label.background.as_str());
        ctx.fill_rect(label.x - 4.0, baseline - 13.0, text_width + 8.0, 18.0);
        set_stroke(ctx, label.border.as_str());
        ctx.stroke_rect(label.x - 4.0, baseline - 13.0, text_width + 8.0, 18.0);
        set_fill(ctx, AXIS_COLOR);
        ctx.fill_text(&label.text, label.x, baseline).map_err(js_error("draw hover text"))
    }

    /// Vertical and horizontal guides through a canvas point
    pub fn draw_crosshair(&self, plot: &PlotArea, x: f64, y: f64) {
        let ctx = &self.context;
        ctx.save();
        set_stroke(ctx, CROSSHAIR_COLOR);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(x, plot.top);
        ctx.line_to(x, plot.top + plot.height);
        ctx.move_to(plot.left, y);
        ctx.line_to(plot.left + plot.width, y);
        ctx.stroke();
        ctx.restore();
    }

    /// One row per indicator line in the top-right corner of the plot
    fn draw_legend(&self, figure: &ChartFigure, plot: &PlotArea) -> ChartResult<()> {
        let ctx = &self.context;
        ctx.set_font(FONT);
        let label_width = figure
            .legend()
            .map(|(label, _)| ctx.measure_text(label).map(|m| m.width()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(js_error("measure legend"))?
            .into_iter()
            .fold(0.0, f64::max);
        if label_width == 0.0 {
            return Ok(());
        }

        let left = plot.left + plot.width - label_width - LEGEND_SAMPLE - 16.0;
        let mut y = plot.top + LEGEND_ROW;
        for (label, style) in figure.legend() {
            ctx.save();
            apply_line_style(ctx, style)?;
            ctx.begin_path();
            ctx.move_to(left, y - 4.0);
            ctx.line_to(left + LEGEND_SAMPLE, y - 4.0);
            ctx.stroke();
            ctx.restore();

            set_fill(ctx, AXIS_COLOR);
            ctx.fill_text(label, left + LEGEND_SAMPLE + 6.0, y).map_err(js_error("draw legend"))?;
            y += LEGEND_ROW;
        }
        Ok(())
    }

    fn draw_background(&self) {
        let (w, h) = (self.width as f64, self.height as f64);
        self.context.clear_rect(0.0, 0.0, w, h);
        set_fill(&self.context, BACKGROUND);
        self.context.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_grid(&self, figure: &ChartFigure, plot: &PlotArea, vp: &Viewport) -> ChartResult<()> {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(figure.axis.grid_alpha);
        set_stroke(ctx, GRID_COLOR);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for i in 0..=PRICE_TICKS {
            let y = plot.top + plot.height * i as f64 / PRICE_TICKS as f64;
            ctx.move_to(plot.left, y);
            ctx.line_to(plot.left + plot.width, y);
        }
        for date in label_dates(figure) {
            let (x, _) = plot.to_screen(vp, date_to_ms(date), vp.min_price);
            if (plot.left..=plot.left + plot.width).contains(&x) {
                ctx.move_to(x, plot.top);
                ctx.line_to(x, plot.top + plot.height);
            }
        }
        ctx.stroke();
        ctx.restore();
        Ok(())
    }

    fn draw_candles(&self, figure: &ChartFigure, plot: &PlotArea, vp: &Viewport) {
        let ctx = &self.context;
        let body_width = (figure.candles.first().map_or(0.0, |c| c.width) * plot.time_scale(vp)).max(1.0);

        for candle in &figure.candles {
            let color = figure.body_color(candle.direction).as_str();
            let (x, top) = plot.to_screen(vp, candle.x, candle.top());
            let (_, bottom) = plot.to_screen(vp, candle.x, candle.bottom());
            if x + body_width < plot.left || x - body_width > plot.left + plot.width {
                continue;
            }

            set_stroke(ctx, OUTLINE_COLOR);
            ctx.set_line_width(1.0);
            if let Some((high, low)) = candle.wick {
                let (_, high_y) = plot.to_screen(vp, candle.x, high);
                let (_, low_y) = plot.to_screen(vp, candle.x, low);
                ctx.begin_path();
                ctx.move_to(x, high_y);
                ctx.line_to(x, low_y);
                ctx.stroke();
            }

            set_fill(ctx, color);
            ctx.fill_rect(x - body_width / 2.0, top, body_width, (bottom - top).max(1.0));
            ctx.stroke_rect(x - body_width / 2.0, top, body_width, (bottom - top).max(1.0));
        }
    }

    fn draw_line(&self, line: &RenderedLine, plot: &PlotArea, vp: &Viewport) -> ChartResult<()> {
        let ctx = &self.context;
        ctx.save();
        apply_line_style(ctx, &line.style)?;
        for segment in line.segments() {
            let mut points = segment.iter().map(|&(t, v)| plot.to_screen(vp, t, v));
            let Some((x0, y0)) = points.next() else { continue };
            ctx.begin_path();
            ctx.move_to(x0, y0);
            for (x, y) in points {
                ctx.line_to(x, y);
            }
            ctx.stroke();
        }
        ctx.restore();
        Ok(())
    }

    fn draw_axes(&self, figure: &ChartFigure, plot: &PlotArea, vp: &Viewport) -> ChartResult<()> {
        let ctx = &self.context;
        set_fill(ctx, AXIS_COLOR);
        ctx.set_font(FONT);

        for i in 0..=PRICE_TICKS {
            let y = plot.top + plot.height * i as f64 / PRICE_TICKS as f64;
            let price = vp.y_to_price(y - plot.top);
            ctx.fill_text(&format!("{price:.2}"), 4.0, y + 4.0).map_err(js_error("draw price label"))?;
        }

        let label_y = plot.top + plot.height + 12.0;
        for date in label_dates(figure) {
            let (x, _) = plot.to_screen(vp, date_to_ms(date), vp.min_price);
            if !(plot.left..=plot.left + plot.width).contains(&x) {
                continue;
            }
            ctx.save();
            ctx.translate(x, label_y).map_err(js_error("translate date label"))?;
            ctx.rotate(-figure.axis.label_orientation).map_err(js_error("rotate date label"))?;
            let text = date.format("%b %d").to_string();
            let text_width = ctx.measure_text(&text).map_err(js_error("measure date label"))?.width();
            ctx.fill_text(&text, -text_width, 0.0).map_err(js_error("draw date label"))?;
            ctx.restore();
        }
        Ok(())
    }

    fn draw_title(&self, figure: &ChartFigure) -> ChartResult<()> {
        if figure.title.is_empty() {
            return Ok(());
        }
        set_fill(&self.context, AXIS_COLOR);
        self.context.set_font(TITLE_FONT);
        self.context
            .fill_text(&figure.title, PlotArea::MARGIN_LEFT, PlotArea::MARGIN_TOP - 10.0)
            .map_err(js_error("draw title"))
    }
}

impl ChartRenderer for CanvasRenderer {
    fn draw(&mut self, figure: &ChartFigure) -> ChartResult<()> {
        log_debug!(
            LogComponent::Infrastructure("CanvasRenderer"),
            "drawing {} candles and {} lines",
            figure.candles.len(),
            figure.lines.len()
        );

        let plot = self.plot_area();
        let vp = self.viewport.clone().unwrap_or_else(|| plot.viewport_for(figure));

        self.draw_background();
        self.draw_grid(figure, &plot, &vp)?;

        self.context.save();
        self.context.begin_path();
        self.context.rect(plot.left, plot.top, plot.width, plot.height);
        self.context.clip();
        self.draw_candles(figure, &plot, &vp);
        for line in &figure.lines {
            self.draw_line(line, &plot, &vp)?;
        }
        self.context.restore();
        self.draw_legend(figure, &plot)?;

        self.draw_axes(figure, &plot, &vp)?;
        self.draw_title(figure)?;
        self.draw_hover_label(&figure.hover_label)?;

        log_info!(LogComponent::Infrastructure("CanvasRenderer"), "chart '{}' drawn", figure.title);
        Ok(())
    }
}

/// Evenly spaced subset of the figure dates used for ticks
fn label_dates(figure: &ChartFigure) -> impl Iterator<Item = chrono::NaiveDate> + '_ {
    let step = figure.dates.len().div_ceil(MAX_DATE_LABELS).max(1);
    figure.dates.iter().copied().step_by(step)
}

fn apply_line_style(ctx: &CanvasRenderingContext2d, style: &LineStyle) -> ChartResult<()> {
    set_stroke(ctx, style.color.as_str());
    ctx.set_global_alpha(style.alpha);
    ctx.set_line_width(style.width);
    let dash = js_sys::Array::new();
    if let Some([on, off]) = style.dash {
        dash.push(&JsValue::from_f64(on as f64));
        dash.push(&JsValue::from_f64(off as f64));
    }
    ctx.set_line_dash(&dash).map_err(js_error("set line dash"))
}

fn set_fill(ctx: &CanvasRenderingContext2d, color: &str) {
    ctx.set_fill_style_str(color);
}

fn set_stroke(ctx: &CanvasRenderingContext2d, color: &str) {
    ctx.set_stroke_style_str(color);
}
