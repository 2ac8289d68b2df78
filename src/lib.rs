//! Candlestick stock chart core.
//!
//! Calendar normalization, EMA and Bollinger indicators, the hover data index
//! and the chart composer, with an optional canvas renderer for the browser.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::{ChartConfig, DEFAULT_DAYS, StockChart};
pub use domain::chart::{ChartDataIndex, ChartFigure, LookAndFeel};
pub use domain::errors::{ChartError, ChartResult};
pub use domain::market_data::{IndicatorKind, IndicatorSpec, PricePoint, PriceSeries};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Install the console logger, wall clock and panic hook
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(logger));
    domain::logging::init_time_provider(Box::new(infrastructure::services::SystemTimeProvider::new()));

    crate::log_info!(domain::logging::LogComponent::Presentation("Initialize"), "stock chart module initialized");
}
