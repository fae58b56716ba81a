// File: crates/resolution-core/src/timeframe.rs
// Summary: Timeframe catalog, display resolutions, and selection of the resolutions worth offering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::series::Timestamped;
use crate::types::DEFAULT_MIN_BUCKETS;

/// Catalog of display timeframes, finest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Min1,
    #[serde(rename = "5m")]
    Min5,
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "30m")]
    Min30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::Min1,
        Timeframe::Min5,
        Timeframe::Min15,
        Timeframe::Min30,
        Timeframe::Hour1,
        Timeframe::Hour4,
        Timeframe::Day1,
        Timeframe::Week1,
    ];

    /// Duration in seconds.
    pub const fn seconds(&self) -> i64 {
        match self {
            Timeframe::Min1 => 60,
            Timeframe::Min5 => 5 * 60,
            Timeframe::Min15 => 15 * 60,
            Timeframe::Min30 => 30 * 60,
            Timeframe::Hour1 => 60 * 60,
            Timeframe::Hour4 => 4 * 60 * 60,
            Timeframe::Day1 => 24 * 60 * 60,
            Timeframe::Week1 => 7 * 24 * 60 * 60,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Timeframe::Min1 => "1m",
            Timeframe::Min5 => "5m",
            Timeframe::Min15 => "15m",
            Timeframe::Min30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "1w",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tf| tf.name() == name)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown timeframe: {s}"))
    }
}

/// A resolution a chart can display: a catalog timeframe, or the cleaned
/// input itself when no timeframe fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Resolution {
    Raw,
    Timeframe(Timeframe),
}

impl Resolution {
    pub const RAW_NAME: &'static str = "raw";

    pub const fn name(&self) -> &'static str {
        match self {
            Resolution::Raw => Self::RAW_NAME,
            Resolution::Timeframe(tf) => tf.name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name == Self::RAW_NAME {
            return Some(Resolution::Raw);
        }
        Timeframe::from_name(name).map(Resolution::Timeframe)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self { r.name().to_string() }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Resolution::from_name(&s).ok_or_else(|| format!("unknown resolution: {s}"))
    }
}

/// Knobs for [`select_resolutions`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorOptions {
    /// Candidate timeframes, in display order.
    pub catalog: Vec<Timeframe>,
    /// Minimum number of aggregate points a timeframe must yield over the span.
    pub min_buckets: f64,
    /// Require the timeframe to be an exact multiple of the source interval.
    pub strict_multiple: bool,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            catalog: Timeframe::ALL.to_vec(),
            min_buckets: DEFAULT_MIN_BUCKETS,
            strict_multiple: false,
        }
    }
}

impl SelectorOptions {
    pub fn with_catalog(mut self, catalog: impl Into<Vec<Timeframe>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn with_min_buckets(mut self, min_buckets: f64) -> Self {
        self.min_buckets = min_buckets;
        self
    }

    pub fn with_strict_multiple(mut self, strict: bool) -> Self {
        self.strict_multiple = strict;
        self
    }

    /// Whether `tf` is worth offering for a series with this interval and span.
    pub fn accepts(&self, tf: Timeframe, source_interval: i64, span: i64) -> bool {
        let duration = tf.seconds();
        if duration < source_interval {
            return false;
        }
        if self.strict_multiple && duration % source_interval != 0 {
            return false;
        }
        span as f64 / duration as f64 >= self.min_buckets
    }
}

/// Spacing between the first two points. Fails unless it is positive.
pub fn source_interval<P: Timestamped>(points: &[P]) -> Result<i64, SeriesError> {
    let interval = match points {
        [first, second, ..] => second.time() - first.time(),
        _ => {
            return Err(SeriesError::InsufficientData { valid: points.len(), total: points.len() });
        }
    };
    if interval <= 0 {
        return Err(SeriesError::InvalidSeries { interval });
    }
    Ok(interval)
}

/// Pick the resolutions to offer for a cleaned sequence, finest first.
/// Falls back to `[Resolution::Raw]` when no catalog timeframe qualifies.
pub fn select_resolutions<P: Timestamped>(
    points: &[P],
    opts: &SelectorOptions,
) -> Result<Vec<Resolution>, SeriesError> {
    let interval = source_interval(points)?;
    let span = points[points.len() - 1].time() - points[0].time();

    let picked: Vec<Resolution> = opts
        .catalog
        .iter()
        .copied()
        .filter(|tf| opts.accepts(*tf, interval, span))
        .map(Resolution::Timeframe)
        .collect();

    if picked.is_empty() {
        tracing::debug!(interval, span, "no timeframe qualifies, falling back to raw");
        return Ok(vec![Resolution::Raw]);
    }
    Ok(picked)
}
