//! Market data aggregate: daily prices, calendar normalization and indicators.

pub mod entities;
pub mod indicator_engine;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use indicator_engine::{IndicatorKind, IndicatorSpec, IndicatorStyle};
pub use services::{CalendarNormalizer, forward_fill, normalize_calendar};
pub use value_objects::*;
