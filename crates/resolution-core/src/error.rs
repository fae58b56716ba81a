// File: crates/resolution-core/src/error.rs
// Summary: Error types for series validation, candle construction and chart state.

use thiserror::Error;

/// Errors raised while cleaning a raw batch or choosing its resolutions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// Parallel input arrays do not have the same length.
    #[error("input arrays differ in length: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Fewer than two points survived cleaning. The caller shows an empty state.
    #[error("not enough valid points to chart ({valid} of {total} rows usable)")]
    InsufficientData { valid: usize, total: usize },

    /// Two consecutive timestamps are equal or decreasing.
    #[error("invalid series: gap of {interval}s between consecutive points (timestamps must strictly increase)")]
    InvalidSeries { interval: i64 },
}

impl SeriesError {
    /// `true` for conditions the caller renders as "no data" instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SeriesError::InsufficientData { .. })
    }
}

/// OHLC invariant violations reported by [`crate::series::OhlcPoint::try_new`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleError {
    #[error("low above min(open,close)")]
    LowAboveBody,
    #[error("high below max(open,close)")]
    HighBelowBody,
    #[error("low above high")]
    LowAboveHigh,
}

/// Errors returned by [`crate::controller::ChartController`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("no chart attached under id '{0}'")]
    UnknownChart(String),

    #[error("resolution '{name}' was not computed for chart '{chart}'")]
    UnknownResolution { chart: String, name: String },

    #[error(transparent)]
    Series(#[from] SeriesError),
}
