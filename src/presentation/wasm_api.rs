use wasm_bindgen::prelude::*;

use crate::application::{ChartConfig, StockChart};
use crate::domain::{
    chart::{ChartFigure, LookAndFeel},
    errors::ChartError,
    logging::LogComponent,
    market_data::{IndicatorSpec, PriceSeries},
};
use crate::infrastructure::dto::series_from_json;
use crate::log_debug;

#[cfg(feature = "render")]
use crate::infrastructure::rendering::{CanvasRenderer, ChartRenderer, HoverController};

impl From<ChartError> for JsValue {
    fn from(err: ChartError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn json_error(err: serde_json::Error) -> JsValue {
    JsValue::from_str(&format!("serialization failed: {err}"))
}

/// JavaScript facade over the chart composer.
///
/// Setters mirror the builder; `build` caches the figure that the query and
/// render methods work on.
#[wasm_bindgen]
pub struct StockChartApi {
    chart: StockChart,
    figure: Option<ChartFigure>,
    #[cfg(feature = "render")]
    renderer: Option<CanvasRenderer>,
    #[cfg(feature = "render")]
    hover: Option<HoverController>,
}

impl StockChartApi {
    fn update(&mut self, f: impl FnOnce(StockChart) -> StockChart) {
        let chart = std::mem::replace(&mut self.chart, StockChart::new(PriceSeries::default()));
        self.chart = f(chart);
        self.figure = None;
    }

    fn figure(&mut self) -> Result<&ChartFigure, JsValue> {
        if self.figure.is_none() {
            self.figure = Some(self.chart.build()?);
        }
        self.figure
            .as_ref()
            .ok_or_else(|| JsValue::from_str("chart not built"))
    }
}

impl Default for StockChartApi {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl StockChartApi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            chart: StockChart::new(PriceSeries::default()),
            figure: None,
            #[cfg(feature = "render")]
            renderer: None,
            #[cfg(feature = "render")]
            hover: None,
        }
    }

    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: String) {
        self.update(|chart| chart.set_title(title));
    }

    #[wasm_bindgen(js_name = setDays)]
    pub fn set_days(&mut self, days: usize) {
        self.update(|chart| chart.set_days(days));
    }

    /// Replace the price data with a JSON array of `{Date, Open, High, Low, Close}` rows
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, rows_json: &str) -> Result<(), JsValue> {
        let series = series_from_json(rows_json)?;
        log_debug!(LogComponent::Presentation("StockChartApi"), "loaded {} rows", series.len());
        self.update(|chart| chart.set_data(series));
        Ok(())
    }

    #[wasm_bindgen(js_name = addEma)]
    pub fn add_ema(&mut self, period: usize) {
        self.update(|chart| chart.add_indicator(IndicatorSpec::ema(period)));
    }

    #[wasm_bindgen(js_name = addBollinger)]
    pub fn add_bollinger(&mut self, period: usize) {
        self.update(|chart| chart.add_indicator(IndicatorSpec::bollinger(period)));
    }

    #[wasm_bindgen(js_name = setLookAndFeel)]
    pub fn set_look_and_feel(&mut self, json: &str) -> Result<(), JsValue> {
        let look_and_feel: LookAndFeel = serde_json::from_str(json)
            .map_err(|e| ChartError::invalid_input(format!("look and feel: {e}")))?;
        self.update(|chart| chart.set_look_and_feel(&look_and_feel));
        Ok(())
    }

    /// Apply a full chart configuration document
    pub fn configure(&mut self, config_json: &str) -> Result<(), JsValue> {
        let config = ChartConfig::from_json(config_json)?;
        self.update(|chart| chart.apply_config(&config));
        Ok(())
    }

    pub fn build(&mut self) -> Result<(), JsValue> {
        self.figure().map(|_| ())
    }

    #[wasm_bindgen(js_name = buildJson)]
    pub fn build_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(self.figure()?).map_err(json_error)
    }

    #[wasm_bindgen(js_name = dataIndexJson)]
    pub fn data_index_json(&mut self) -> Result<String, JsValue> {
        self.figure()?.data_index.to_json().map_err(json_error)
    }

    /// Hover readout for a time coordinate in ms since the epoch
    #[wasm_bindgen(js_name = hoverText)]
    pub fn hover_text(&mut self, x_ms: f64) -> Result<Option<String>, JsValue> {
        Ok(self.figure()?.data_index.hover_text(x_ms))
    }

    /// Messages for the indicators dropped by the last build
    #[wasm_bindgen(js_name = indicatorErrors)]
    pub fn indicator_errors(&mut self) -> Result<js_sys::Array, JsValue> {
        Ok(self
            .figure()?
            .indicator_errors
            .iter()
            .map(|e| JsValue::from_str(&e.to_string()))
            .collect())
    }
}

#[cfg(feature = "render")]
#[wasm_bindgen]
impl StockChartApi {
    /// Build if needed and draw onto the canvas with id `canvas_id`
    pub fn render(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let figure = self.figure()?.clone();
        let mut renderer = CanvasRenderer::from_canvas_id(canvas_id, figure.style.width, figure.style.height)?;
        renderer.draw(&figure)?;
        self.hover = Some(HoverController::new(&figure));
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Update the hover label and crosshair for a canvas-relative pointer and redraw
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, pointer_x: f64, pointer_y: f64) -> Result<Option<String>, JsValue> {
        let Some(hover) = self.hover.as_mut() else {
            return Ok(None);
        };
        let text = hover.on_pointer_move(pointer_x, pointer_y).map(str::to_string);
        self.redraw()?;
        Ok(text)
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<(), JsValue> {
        if let Some(hover) = self.hover.as_mut() {
            hover.on_pointer_leave();
        }
        self.redraw()
    }

    /// Horizontal drag of `delta_px` pixels
    pub fn pan(&mut self, delta_px: f64) -> Result<(), JsValue> {
        if let Some(hover) = self.hover.as_mut() {
            hover.drag(delta_px);
        }
        self.redraw()
    }
}

#[cfg(feature = "render")]
impl StockChartApi {
    fn redraw(&mut self) -> Result<(), JsValue> {
        let (Some(renderer), Some(hover), Some(figure)) =
            (self.renderer.as_mut(), self.hover.as_ref(), self.figure.as_ref())
        else {
            return Ok(());
        };
        renderer.set_viewport(Some(hover.viewport().clone()));
        renderer.draw(figure)?;
        hover.render_label(renderer)?;
        Ok(())
    }
}
