// File: crates/demo/src/input.rs
// Summary: Loads backtest result JSON or a Binance-like OHLC CSV into raw engine batches.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use resolution_core::{RawSeries, RawSignal};
use serde::Deserialize;

/// One chart's worth of input.
pub struct ChartInput {
    pub id: String,
    pub raw: RawSeries,
    /// Symbol used to filter trade markers; `None` shows every signal.
    pub symbol: Option<String>,
}

pub struct Loaded {
    pub charts: Vec<ChartInput>,
    pub signals: Vec<RawSignal>,
}

#[derive(Deserialize)]
struct Payload {
    results: Results,
    #[serde(default)]
    market_data: BTreeMap<String, MarketData>,
}

#[derive(Deserialize)]
struct Results {
    graph_data: GraphData,
    #[serde(default)]
    trades_history: Vec<RawSignal>,
}

#[derive(Deserialize)]
struct GraphData {
    timestamp: Vec<String>,
    #[serde(alias = "portfolio_value")]
    total_value: Vec<Option<f64>>,
    #[serde(default)]
    benchmark: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct MarketData {
    timestamp: Vec<String>,
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}

fn nan_for_null(v: Vec<Option<f64>>) -> Vec<f64> {
    v.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect()
}

/// Dispatch on extension: `.json` backtest results, anything else as CSV.
pub fn load(path: &Path, symbol: Option<&str>) -> Result<Loaded> {
    let is_json = path
        .extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case("json"));
    if is_json {
        load_results_json(path, symbol)
    } else {
        let raw = load_ohlc_csv(path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
        let id = symbol
            .map(str::to_string)
            .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "candles".to_string());
        Ok(Loaded { charts: vec![ChartInput { id, raw, symbol: symbol.map(str::to_string) }], signals: Vec::new() })
    }
}

/// Equity curve, optional benchmark, and one candle chart per traded symbol.
fn load_results_json(path: &Path, only: Option<&str>) -> Result<Loaded> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let payload: Payload = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let graph = payload.results.graph_data;

    let mut charts = vec![ChartInput {
        id: "equity".to_string(),
        raw: RawSeries::line(graph.timestamp.clone(), nan_for_null(graph.total_value)),
        symbol: None,
    }];
    if let Some(bench) = graph.benchmark {
        charts.push(ChartInput {
            id: "benchmark".to_string(),
            raw: RawSeries::line(graph.timestamp, nan_for_null(bench)),
            symbol: None,
        });
    }
    for (sym, md) in payload.market_data {
        if only.is_some_and(|o| !o.eq_ignore_ascii_case(&sym)) {
            continue;
        }
        charts.push(ChartInput {
            id: sym.clone(),
            raw: RawSeries::candle(
                md.timestamp,
                nan_for_null(md.open),
                nan_for_null(md.high),
                nan_for_null(md.low),
                nan_for_null(md.close),
            ),
            symbol: Some(sym),
        });
    }
    tracing::info!(charts = charts.len(), trades = payload.results.trades_history.len(), "loaded backtest results");
    Ok(Loaded { charts, signals: payload.results.trades_history })
}

/// Load Binance-like OHLC CSV as a raw candle batch. Unparseable numbers become NaN
/// and are dropped by validation.
fn load_ohlc_csv(path: &Path) -> Result<RawSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    tracing::debug!(?headers, "csv headers");

    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"])
        .context("no time column (time/timestamp/open_time/date/datetime)")?;
    let i_open = idx(&["open", "o"]).context("no open column")?;
    let i_high = idx(&["high", "h"]).context("no high column")?;
    let i_low = idx(&["low", "l"]).context("no low column")?;
    let i_close = idx(&["close", "c", "adj_close", "close_price"]).context("no close column")?;

    let (mut ts, mut open, mut high, mut low, mut close) = (Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for rec in rdr.records() {
        let rec = rec?;
        let num = |i: usize| rec.get(i).and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN);
        ts.push(rec.get(i_time).unwrap_or_default().to_string());
        open.push(num(i_open));
        high.push(num(i_high));
        low.push(num(i_low));
        close.push(num(i_close));
    }
    tracing::info!(rows = ts.len(), "loaded csv");
    Ok(RawSeries::candle(ts, open, high, low, close))
}
