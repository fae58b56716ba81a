// File: crates/resolution-core/src/validate.rs
// Summary: Cleans raw parallel arrays into an ordered point sequence with a checked source interval.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SeriesError;
use crate::series::{OhlcPoint, SeriesData, SeriesKind, TimePoint, Timestamped};
use crate::timeframe::source_interval;
use crate::types::MIN_VALID_POINTS;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an absolute date-time into epoch seconds.
///
/// Accepts RFC 3339, RFC 2822 (`Mon, 01 Jan 2024 00:00:00 GMT`),
/// `YYYY-MM-DD HH:MM:SS` (and `T`-separated / fractional variants) read as
/// UTC, a bare `YYYY-MM-DD` (midnight UTC), and integer epoch seconds or
/// milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms -> sec
        if n.abs() > 10_i64.pow(12) {
            return Some(n.div_euclid(1000));
        }
        return Some(n);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    // HTTP-date style, as JSON encoders emit for datetimes
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// A raw batch as delivered by the data provider: parallel arrays of equal length.
/// Missing numbers (`null` in JSON) are read as NaN and dropped during cleaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSeries {
    Candle {
        timestamps: Vec<String>,
        #[serde(deserialize_with = "nullable_f64s")]
        open: Vec<f64>,
        #[serde(deserialize_with = "nullable_f64s")]
        high: Vec<f64>,
        #[serde(deserialize_with = "nullable_f64s")]
        low: Vec<f64>,
        #[serde(deserialize_with = "nullable_f64s")]
        close: Vec<f64>,
    },
    Line {
        timestamps: Vec<String>,
        #[serde(deserialize_with = "nullable_f64s")]
        values: Vec<f64>,
    },
}

fn nullable_f64s<'de, D>(de: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Option<f64>>::deserialize(de)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

impl RawSeries {
    pub fn line(timestamps: Vec<String>, values: Vec<f64>) -> Self {
        RawSeries::Line { timestamps, values }
    }

    pub fn candle(timestamps: Vec<String>, open: Vec<f64>, high: Vec<f64>, low: Vec<f64>, close: Vec<f64>) -> Self {
        RawSeries::Candle { timestamps, open, high, low, close }
    }

    pub fn kind(&self) -> SeriesKind {
        match self {
            RawSeries::Line { .. } => SeriesKind::Line,
            RawSeries::Candle { .. } => SeriesKind::Candle,
        }
    }

    /// Number of input rows (length of the timestamp array).
    pub fn len(&self) -> usize {
        match self {
            RawSeries::Line { timestamps, .. } | RawSeries::Candle { timestamps, .. } => timestamps.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A validated, immutable batch: at least two points, strictly positive source interval.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanSeries {
    data: SeriesData,
    source_interval: i64,
    dropped: usize,
    irregular_gaps: usize,
}

impl CleanSeries {
    pub fn data(&self) -> &SeriesData { &self.data }
    pub fn into_data(self) -> SeriesData { self.data }
    pub fn kind(&self) -> SeriesKind { self.data.kind() }
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    /// Spacing between the first two points, in seconds.
    pub fn source_interval(&self) -> i64 { self.source_interval }
    /// Input rows discarded for an unparseable timestamp or a non-finite number.
    pub fn dropped(&self) -> usize { self.dropped }
    /// Later gaps that differ from the source interval.
    pub fn irregular_gaps(&self) -> usize { self.irregular_gaps }
    /// First-to-last time span, in seconds.
    pub fn span(&self) -> i64 {
        let last = self.data.len().saturating_sub(1);
        match (self.data.time_at(0), self.data.time_at(last)) {
            (Some(a), Some(b)) => b - a,
            _ => 0,
        }
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), SeriesError> {
    if expected != actual {
        return Err(SeriesError::LengthMismatch { field, expected, actual });
    }
    Ok(())
}

/// Pair timestamps with values by index, dropping rows that fail to parse or are not finite.
/// Returns the surviving points in input order and the number of dropped rows.
pub fn clean_line(timestamps: &[String], values: &[f64]) -> Result<(Vec<TimePoint>, usize), SeriesError> {
    check_len("values", timestamps.len(), values.len())?;
    let mut out = Vec::with_capacity(timestamps.len());
    for (idx, (ts, &value)) in timestamps.iter().zip(values).enumerate() {
        let Some(time) = parse_timestamp(ts) else {
            tracing::debug!(idx, timestamp = %ts, "dropping row: unparseable timestamp");
            continue;
        };
        if !value.is_finite() {
            tracing::debug!(idx, "dropping row: value is not a number");
            continue;
        }
        out.push(TimePoint { time, value });
    }
    let dropped = timestamps.len() - out.len();
    Ok((out, dropped))
}

/// OHLC counterpart of [`clean_line`]; a row is dropped if any of its four prices is not finite.
pub fn clean_candles(
    timestamps: &[String],
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
) -> Result<(Vec<OhlcPoint>, usize), SeriesError> {
    let n = timestamps.len();
    check_len("open", n, open.len())?;
    check_len("high", n, high.len())?;
    check_len("low", n, low.len())?;
    check_len("close", n, close.len())?;

    let mut out = Vec::with_capacity(n);
    for idx in 0..n {
        let Some(time) = parse_timestamp(&timestamps[idx]) else {
            tracing::debug!(idx, timestamp = %timestamps[idx], "dropping candle: unparseable timestamp");
            continue;
        };
        let (o, h, l, c) = (open[idx], high[idx], low[idx], close[idx]);
        if !(o.is_finite() && h.is_finite() && l.is_finite() && c.is_finite()) {
            tracing::debug!(idx, "dropping candle: price is not a number");
            continue;
        }
        out.push(OhlcPoint { time, open: o, high: h, low: l, close: c });
    }
    let dropped = n - out.len();
    Ok((out, dropped))
}

/// Count later gaps that differ from `interval`; any gap that is not positive rejects the batch.
fn check_gaps<P: Timestamped>(points: &[P], interval: i64) -> Result<usize, SeriesError> {
    let mut irregular = 0;
    for (idx, w) in points.windows(2).enumerate().skip(1) {
        let gap = w[1].time() - w[0].time();
        if gap <= 0 {
            tracing::debug!(idx = idx + 1, gap, "timestamps out of order");
            return Err(SeriesError::InvalidSeries { interval: gap });
        }
        if gap != interval {
            irregular += 1;
        }
    }
    Ok(irregular)
}

/// Validate a raw batch.
///
/// Fails with `LengthMismatch` when the arrays disagree in length,
/// `InsufficientData` when fewer than two rows survive (recoverable), and
/// `InvalidSeries` when any two consecutive timestamps do not strictly increase.
/// Uneven positive gaps are tolerated and only counted.
pub fn validate(raw: &RawSeries) -> Result<CleanSeries, SeriesError> {
    let total = raw.len();
    let (data, dropped) = match raw {
        RawSeries::Line { timestamps, values } => {
            let (pts, dropped) = clean_line(timestamps, values)?;
            (SeriesData::Line(pts), dropped)
        }
        RawSeries::Candle { timestamps, open, high, low, close } => {
            let (pts, dropped) = clean_candles(timestamps, open, high, low, close)?;
            (SeriesData::Candle(pts), dropped)
        }
    };

    if dropped > 0 {
        tracing::debug!(dropped, total, "discarded invalid rows");
    }
    if data.len() < MIN_VALID_POINTS {
        return Err(SeriesError::InsufficientData { valid: data.len(), total });
    }

    let (source_interval, irregular_gaps) = match &data {
        SeriesData::Line(v) => {
            let iv = source_interval(v)?;
            (iv, check_gaps(v, iv)?)
        }
        SeriesData::Candle(v) => {
            let iv = source_interval(v)?;
            (iv, check_gaps(v, iv)?)
        }
    };
    if irregular_gaps > 0 {
        tracing::warn!(irregular_gaps, source_interval, "series is not regularly sampled; buckets may be uneven");
    }

    Ok(CleanSeries { data, source_interval, dropped, irregular_gaps })
}
