// File: crates/resolution-core/src/lib.rs
// Summary: Core library entry point; exports the validation, aggregation and chart-state API.

pub mod aggregate;
pub mod controller;
pub mod downsample;
pub mod error;
pub mod markers;
pub mod series;
pub mod surface;
pub mod timeframe;
pub mod types;
pub mod validate;

pub use aggregate::{aggregate_all, aggregate_at, prepare_series, AggregatedSeries};
pub use controller::{ChartController, Prepared};
pub use downsample::{aggregate_line, aggregate_ohlc, aggregate_ohlc_buckets, bucket_reduce, points_per_bucket};
pub use error::{CandleError, ChartError, SeriesError};
pub use markers::{align_markers, clean_signals, Marker, MarkerPosition, MarkerShape, RawSignal, Side, TradeSignal};
pub use series::{OhlcPoint, SeriesData, SeriesKind, TimePoint, Timestamped};
pub use surface::RenderSurface;
pub use timeframe::{select_resolutions, Resolution, SelectorOptions, Timeframe};
pub use types::{ChartId, EngineOptions, MAX_VALUE_DECIMALS};
pub use validate::{parse_timestamp, validate, CleanSeries, RawSeries};
