// File: crates/resolution-core/src/aggregate.rs
// Summary: Builds the per-resolution dataset map for one validated batch.

use serde::Serialize;

use crate::downsample::{aggregate_line, aggregate_ohlc};
use crate::error::SeriesError;
use crate::series::SeriesData;
use crate::timeframe::{select_resolutions, Resolution};
use crate::types::EngineOptions;
use crate::validate::{validate, CleanSeries, RawSeries};

/// Resolution name -> dataset, finest resolution first. Every dataset has the
/// same series kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AggregatedSeries {
    entries: Vec<(Resolution, SeriesData)>,
}

impl AggregatedSeries {
    pub fn get(&self, name: &str) -> Option<&SeriesData> {
        self.entries.iter().find(|(r, _)| r.name() == name).map(|(_, d)| d)
    }

    pub fn get_resolution(&self, resolution: Resolution) -> Option<&SeriesData> {
        self.entries.iter().find(|(r, _)| *r == resolution).map(|(_, d)| d)
    }

    pub fn resolutions(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.entries.iter().map(|(r, _)| *r)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(r, _)| r.name()).collect()
    }

    /// Finest resolution and its data.
    pub fn first(&self) -> Option<(Resolution, &SeriesData)> {
        self.entries.first().map(|(r, d)| (*r, d))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resolution, &SeriesData)> + '_ {
        self.entries.iter().map(|(r, d)| (*r, d))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Reduce `clean` into one resolution.
pub fn aggregate_at(clean: &CleanSeries, resolution: Resolution, opts: &EngineOptions) -> SeriesData {
    let interval = clean.source_interval();
    match (resolution, clean.data()) {
        (Resolution::Raw, data) => data.clone(),
        (Resolution::Timeframe(tf), SeriesData::Line(pts)) => {
            SeriesData::Line(aggregate_line(pts, tf, interval, opts.value_decimals))
        }
        (Resolution::Timeframe(tf), SeriesData::Candle(pts)) => {
            SeriesData::Candle(aggregate_ohlc(pts, tf, interval))
        }
    }
}

/// Select the valid resolutions for `clean` and aggregate into each of them.
pub fn aggregate_all(clean: &CleanSeries, opts: &EngineOptions) -> Result<AggregatedSeries, SeriesError> {
    let resolutions = match clean.data() {
        SeriesData::Line(pts) => select_resolutions(pts, &opts.selector)?,
        SeriesData::Candle(pts) => select_resolutions(pts, &opts.selector)?,
    };
    let entries = resolutions
        .into_iter()
        .map(|r| (r, aggregate_at(clean, r, opts)))
        .collect();
    Ok(AggregatedSeries { entries })
}

/// Validate a raw batch and aggregate it into every valid resolution.
pub fn prepare_series(raw: &RawSeries, opts: &EngineOptions) -> Result<AggregatedSeries, SeriesError> {
    let clean = validate(raw)?;
    let out = aggregate_all(&clean, opts)?;
    tracing::info!(
        kind = ?clean.kind(),
        points = clean.len(),
        dropped = clean.dropped(),
        interval = clean.source_interval(),
        resolutions = ?out.names(),
        "series aggregated"
    );
    Ok(out)
}
