// File: crates/resolution-core/src/types.rs
// Summary: Shared constants and the engine-wide options bundle.

use crate::timeframe::SelectorOptions;

/// A cleaned series needs at least this many points to be charted.
pub const MIN_VALID_POINTS: usize = 2;
/// A timeframe is offered only if the span covers this many of its buckets.
pub const DEFAULT_MIN_BUCKETS: f64 = 4.0;
/// Fractional digits kept on averaged line values.
pub const DEFAULT_VALUE_DECIMALS: u32 = 2;
/// Upper bound on `value_decimals`; keeps `10^decimals` finite.
pub const MAX_VALUE_DECIMALS: u32 = 15;

/// Identifier of a logical chart (e.g. "equity", "benchmark", "BTCUSDC").
pub type ChartId = String;

/// Options shared by the selector and the aggregators.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineOptions {
    pub selector: SelectorOptions,
    /// Fractional digits of averaged line values.
    pub value_decimals: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            selector: SelectorOptions::default(),
            value_decimals: DEFAULT_VALUE_DECIMALS,
        }
    }
}

impl EngineOptions {
    pub fn with_selector(mut self, selector: SelectorOptions) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_value_decimals(mut self, decimals: u32) -> Self {
        self.value_decimals = decimals.min(MAX_VALUE_DECIMALS);
        self
    }
}
