// File: crates/resolution-core/src/controller.rs
// Summary: ChartController owns per-chart caches of precomputed resolutions and drives the render surfaces.

use std::collections::HashMap;

use crate::aggregate::{prepare_series, AggregatedSeries};
use crate::error::{ChartError, SeriesError};
use crate::markers::{align_markers, Marker, TradeSignal};
use crate::series::{SeriesData, SeriesKind};
use crate::surface::RenderSurface;
use crate::timeframe::Resolution;
use crate::types::{ChartId, EngineOptions};
use crate::validate::RawSeries;

/// Outcome of [`ChartController::prepare`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prepared {
    /// Datasets were computed; `active` is the one now on the surface.
    Ready { resolutions: Vec<Resolution>, active: Resolution },
    /// Too few valid points; the surface was cleared and should show an empty state.
    NoData,
}

struct ChartSlot {
    surface: Box<dyn RenderSurface>,
    /// Series kind the surface was last set up for.
    surface_kind: Option<SeriesKind>,
    datasets: AggregatedSeries,
    active: Option<Resolution>,
    signals: Vec<TradeSignal>,
    symbol: Option<String>,
    markers: Vec<Marker>,
}

impl ChartSlot {
    fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self {
            surface,
            surface_kind: None,
            datasets: AggregatedSeries::default(),
            active: None,
            signals: Vec::new(),
            symbol: None,
            markers: Vec::new(),
        }
    }

    fn ensure_series(&mut self, kind: SeriesKind) {
        if self.surface_kind != Some(kind) {
            self.surface.add_series(kind);
            self.surface_kind = Some(kind);
        }
    }

    /// Hand `resolution`'s dataset to the surface and realign markers to it.
    /// Callers check that the resolution was computed.
    fn show(&mut self, resolution: Resolution) {
        let Some(kind) = self.datasets.get_resolution(resolution).map(SeriesData::kind) else { return };
        self.ensure_series(kind);
        let Some(data) = self.datasets.get_resolution(resolution) else { return };
        self.surface.set_data(data);
        self.markers = align_markers(&self.signals, data, self.symbol.as_deref());
        self.surface.set_markers(&self.markers);
        self.active = Some(resolution);
    }

    fn refresh_markers(&mut self) {
        let data = self.active.and_then(|r| self.datasets.get_resolution(r));
        self.markers = match data {
            Some(d) => align_markers(&self.signals, d, self.symbol.as_deref()),
            None => Vec::new(),
        };
        self.surface.set_markers(&self.markers);
    }

    fn clear(&mut self, kind: SeriesKind) {
        self.datasets = AggregatedSeries::default();
        self.active = None;
        self.markers.clear();
        self.ensure_series(kind);
        self.surface.set_data(&SeriesData::empty(kind));
        self.surface.set_markers(&[]);
    }
}

/// Keyed owner of chart state. Aggregation happens once per batch in
/// [`prepare`](Self::prepare); switching resolutions only swaps cached data.
///
/// Not synchronised: callers must not prepare the same chart concurrently.
pub struct ChartController {
    opts: EngineOptions,
    charts: HashMap<ChartId, ChartSlot>,
}

impl Default for ChartController {
    fn default() -> Self { Self::new(EngineOptions::default()) }
}

impl ChartController {
    pub fn new(opts: EngineOptions) -> Self {
        Self { opts, charts: HashMap::new() }
    }

    pub fn options(&self) -> &EngineOptions { &self.opts }

    fn slot(&self, chart_id: &str) -> Result<&ChartSlot, ChartError> {
        self.charts.get(chart_id).ok_or_else(|| ChartError::UnknownChart(chart_id.to_string()))
    }

    fn slot_mut(&mut self, chart_id: &str) -> Result<&mut ChartSlot, ChartError> {
        self.charts.get_mut(chart_id).ok_or_else(|| ChartError::UnknownChart(chart_id.to_string()))
    }

    /// Register a surface under `chart_id`. Returns the surface previously
    /// attached under that id, whose cache is dropped.
    pub fn attach(&mut self, chart_id: impl Into<ChartId>, surface: Box<dyn RenderSurface>) -> Option<Box<dyn RenderSurface>> {
        let chart_id = chart_id.into();
        tracing::debug!(chart = %chart_id, "attaching surface");
        self.charts.insert(chart_id, ChartSlot::new(surface)).map(|old| old.surface)
    }

    pub fn is_attached(&self, chart_id: &str) -> bool {
        self.charts.contains_key(chart_id)
    }

    /// Validate and aggregate a new raw batch for `chart_id`, replacing any
    /// previous cache, and display its finest resolution.
    ///
    /// Too few valid points clear the chart and yield [`Prepared::NoData`].
    /// Fatal batch errors are returned and leave the previous cache in place.
    pub fn prepare(&mut self, chart_id: &str, raw: &RawSeries) -> Result<Prepared, ChartError> {
        if !self.charts.contains_key(chart_id) {
            return Err(ChartError::UnknownChart(chart_id.to_string()));
        }
        let result = prepare_series(raw, &self.opts);
        let slot = self.slot_mut(chart_id)?;

        let datasets = match result {
            Ok(datasets) => datasets,
            Err(e @ SeriesError::InsufficientData { .. }) => {
                tracing::info!(chart = %chart_id, error = %e, "no chartable data");
                slot.clear(raw.kind());
                return Ok(Prepared::NoData);
            }
            Err(e) => {
                tracing::debug!(chart = %chart_id, error = %e, "batch rejected");
                return Err(e.into());
            }
        };

        let Some((active, _)) = datasets.first() else {
            slot.clear(raw.kind());
            return Ok(Prepared::NoData);
        };
        let resolutions: Vec<Resolution> = datasets.resolutions().collect();
        slot.datasets = datasets;
        slot.show(active);
        tracing::debug!(chart = %chart_id, active = %active, "chart prepared");
        Ok(Prepared::Ready { resolutions, active })
    }

    /// Display the precomputed dataset named `name`.
    pub fn set_resolution(&mut self, chart_id: &str, name: &str) -> Result<(), ChartError> {
        let slot = self.slot_mut(chart_id)?;
        let resolution = Resolution::from_name(name)
            .filter(|r| slot.datasets.get_resolution(*r).is_some())
            .ok_or_else(|| ChartError::UnknownResolution {
                chart: chart_id.to_string(),
                name: name.to_string(),
            })?;
        slot.show(resolution);
        Ok(())
    }

    /// Replace the chart's trade signals. With `symbol` set, only that
    /// symbol's signals are drawn. Markers follow the active resolution.
    pub fn set_signals(&mut self, chart_id: &str, signals: Vec<TradeSignal>, symbol: Option<String>) -> Result<(), ChartError> {
        let slot = self.slot_mut(chart_id)?;
        slot.signals = signals;
        slot.symbol = symbol;
        slot.refresh_markers();
        Ok(())
    }

    /// Forward a size change to the surface. Never touches the cache.
    pub fn resize(&mut self, chart_id: &str, width: u32, height: u32) -> Result<(), ChartError> {
        self.slot_mut(chart_id)?.surface.resize(width, height);
        Ok(())
    }

    /// Drop the chart's cache and hand back its surface.
    pub fn dispose(&mut self, chart_id: &str) -> Result<Box<dyn RenderSurface>, ChartError> {
        let slot = self
            .charts
            .remove(chart_id)
            .ok_or_else(|| ChartError::UnknownChart(chart_id.to_string()))?;
        tracing::debug!(chart = %chart_id, "disposed");
        Ok(slot.surface)
    }

    /// Names computed for the chart's current batch, finest first.
    pub fn resolutions(&self, chart_id: &str) -> Result<Vec<Resolution>, ChartError> {
        Ok(self.slot(chart_id)?.datasets.resolutions().collect())
    }

    pub fn active_resolution(&self, chart_id: &str) -> Result<Option<Resolution>, ChartError> {
        Ok(self.slot(chart_id)?.active)
    }

    pub fn dataset(&self, chart_id: &str, name: &str) -> Result<&SeriesData, ChartError> {
        self.slot(chart_id)?.datasets.get(name).ok_or_else(|| ChartError::UnknownResolution {
            chart: chart_id.to_string(),
            name: name.to_string(),
        })
    }

    /// Markers currently drawn on the chart.
    pub fn markers(&self, chart_id: &str) -> Result<&[Marker], ChartError> {
        Ok(&self.slot(chart_id)?.markers)
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }
}
