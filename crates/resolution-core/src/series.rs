// File: crates/resolution-core/src/series.rs
// Summary: Point types and the tagged Line/Candle series container shared by every stage.

use serde::{Deserialize, Serialize};

use crate::error::CandleError;

/// Which kind of series a chart displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Candle,
}

/// One sample of a continuous series (equity curve, benchmark).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Epoch seconds.
    pub time: i64,
    pub value: f64,
}

impl TimePoint {
    pub const fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    /// Epoch seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcPoint {
    pub const fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { time, open, high, low, close }
    }

    /// Try to construct a candle enforcing OHLC invariants:
    /// low <= min(open,close) and high >= max(open,close), and low <= high.
    pub fn try_new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Result<Self, CandleError> {
        let lo = open.min(close);
        let hi = open.max(close);
        if low > lo { return Err(CandleError::LowAboveBody); }
        if high < hi { return Err(CandleError::HighBelowBody); }
        if low > high { return Err(CandleError::LowAboveHigh); }
        Ok(Self { time, open, high, low, close })
    }

    pub fn is_consistent(&self) -> bool {
        Self::try_new(self.time, self.open, self.high, self.low, self.close).is_ok()
    }
}

/// Anything carrying an epoch-seconds timestamp.
pub trait Timestamped {
    fn time(&self) -> i64;
}

impl Timestamped for TimePoint {
    fn time(&self) -> i64 { self.time }
}

impl Timestamped for OhlcPoint {
    fn time(&self) -> i64 { self.time }
}

/// An ordered point sequence of a single kind. Times strictly increase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "lowercase")]
pub enum SeriesData {
    Line(Vec<TimePoint>),
    Candle(Vec<OhlcPoint>),
}

impl SeriesData {
    pub fn empty(kind: SeriesKind) -> Self {
        match kind {
            SeriesKind::Line => SeriesData::Line(Vec::new()),
            SeriesKind::Candle => SeriesData::Candle(Vec::new()),
        }
    }

    pub fn kind(&self) -> SeriesKind {
        match self {
            SeriesData::Line(_) => SeriesKind::Line,
            SeriesData::Candle(_) => SeriesKind::Candle,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SeriesData::Line(v) => v.len(),
            SeriesData::Candle(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Timestamp of the point at `idx`.
    pub fn time_at(&self, idx: usize) -> Option<i64> {
        match self {
            SeriesData::Line(v) => v.get(idx).map(|p| p.time),
            SeriesData::Candle(v) => v.get(idx).map(|p| p.time),
        }
    }

    /// All timestamps, in order.
    pub fn times(&self) -> Vec<i64> {
        match self {
            SeriesData::Line(v) => v.iter().map(|p| p.time).collect(),
            SeriesData::Candle(v) => v.iter().map(|p| p.time).collect(),
        }
    }

    /// Exact-match lookup; relies on the ascending-time invariant.
    pub fn contains_time(&self, time: i64) -> bool {
        match self {
            SeriesData::Line(v) => v.binary_search_by_key(&time, |p| p.time).is_ok(),
            SeriesData::Candle(v) => v.binary_search_by_key(&time, |p| p.time).is_ok(),
        }
    }

    pub fn as_line(&self) -> Option<&[TimePoint]> {
        match self {
            SeriesData::Line(v) => Some(v),
            SeriesData::Candle(_) => None,
        }
    }

    pub fn as_candles(&self) -> Option<&[OhlcPoint]> {
        match self {
            SeriesData::Candle(v) => Some(v),
            SeriesData::Line(_) => None,
        }
    }

    /// Value range across the series (candles use low/high). `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        match self {
            SeriesData::Line(v) => {
                for p in v {
                    lo = lo.min(p.value);
                    hi = hi.max(p.value);
                }
            }
            SeriesData::Candle(v) => {
                for c in v {
                    lo = lo.min(c.low);
                    hi = hi.max(c.high);
                }
            }
        }
        if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
    }
}
