// File: crates/resolution-core/src/markers.rs
// Summary: Trade signals and their alignment onto the points of the displayed resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::series::SeriesData;
use crate::validate::parse_timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("unknown signal side: {other}")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

/// A signal as emitted by the backtest (`trades_history` entries).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignal {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub side: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSignal {
    /// Epoch seconds.
    pub time: i64,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl TradeSignal {
    pub fn new(time: i64, side: Side) -> Self {
        Self { time, side, symbol: None }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// Parse raw signals, dropping those with an unparseable timestamp or side.
pub fn clean_signals(raw: &[RawSignal]) -> Vec<TradeSignal> {
    raw.iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            let Some(time) = parse_timestamp(&s.timestamp) else {
                tracing::debug!(idx, timestamp = %s.timestamp, "dropping signal: unparseable timestamp");
                return None;
            };
            match s.side.parse::<Side>() {
                Ok(side) => Some(TradeSignal { time, side, symbol: s.symbol.clone() }),
                Err(e) => {
                    tracing::debug!(idx, error = %e, "dropping signal");
                    None
                }
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    BelowBar,
    AboveBar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
}

/// Renderer-facing marker descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub time: i64,
    pub position: MarkerPosition,
    pub shape: MarkerShape,
    pub label: &'static str,
}

impl Marker {
    pub fn for_side(time: i64, side: Side) -> Self {
        match side {
            Side::Buy => Self { time, position: MarkerPosition::BelowBar, shape: MarkerShape::ArrowUp, label: "BUY" },
            Side::Sell => Self { time, position: MarkerPosition::AboveBar, shape: MarkerShape::ArrowDown, label: "SELL" },
        }
    }
}

/// Map signals onto `data` by exact time match. Signals whose time is not a
/// point of `data` are omitted; there is no nearest-point snapping. When
/// `symbol` is set, signals tagged with another symbol are skipped (untagged
/// signals are kept). Output is sorted by time.
pub fn align_markers(signals: &[TradeSignal], data: &SeriesData, symbol: Option<&str>) -> Vec<Marker> {
    let mut out: Vec<Marker> = signals
        .iter()
        .filter(|s| match (symbol, s.symbol.as_deref()) {
            (Some(want), Some(got)) => want == got,
            _ => true,
        })
        .filter(|s| {
            let hit = data.contains_time(s.time);
            if !hit {
                tracing::trace!(time = s.time, side = %s.side, "signal has no point at this resolution");
            }
            hit
        })
        .map(|s| Marker::for_side(s.time, s.side))
        .collect();
    out.sort_by_key(|m| m.time);
    out
}
