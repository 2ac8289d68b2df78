use crate::domain::market_data::IndicatorKind;
use thiserror::Error;

/// Errors raised while preparing or drawing a chart.
///
/// A hover lookup for an unknown date is not an error: it resolves to `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// Empty or malformed price data. Aborts the whole build.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Indicator configured with a period the series cannot support.
    /// Only that indicator's contribution is dropped.
    #[error("Invalid parameter: {kind} period {period} (series length {len})")]
    InvalidParameter {
        kind: IndicatorKind,
        period: usize,
        len: usize,
    },

    #[error("Rendering error: {0}")]
    Rendering(String),
}

impl ChartError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error aborts the build rather than a single indicator
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidParameter { .. })
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
