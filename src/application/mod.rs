pub mod config;
pub mod stock_chart;

pub use config::*;
pub use stock_chart::*;
