pub mod dto;
pub mod services;

#[cfg(feature = "render")]
pub mod rendering;

pub use dto::{PriceRowDto, rows_to_series, series_from_json};
pub use services::{ConsoleLogger, SystemTimeProvider};
