// File: crates/resolution-core/src/surface.rs
// Summary: Capability trait for the external rendering surface a chart draws into.

use crate::markers::Marker;
use crate::series::{SeriesData, SeriesKind};

/// What the engine needs from a renderer. Implementations own their drawing;
/// the engine only hands over ordered points, markers and size changes.
pub trait RenderSurface {
    /// Create (or replace) the drawable series of the given kind.
    fn add_series(&mut self, kind: SeriesKind);
    /// Replace the displayed points and redraw.
    fn set_data(&mut self, data: &SeriesData);
    /// Replace the overlaid markers and redraw.
    fn set_markers(&mut self, markers: &[Marker]);
    fn resize(&mut self, width: u32, height: u32);
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn add_series(&mut self, kind: SeriesKind) { (**self).add_series(kind) }
    fn set_data(&mut self, data: &SeriesData) { (**self).set_data(data) }
    fn set_markers(&mut self, markers: &[Marker]) { (**self).set_markers(markers) }
    fn resize(&mut self, width: u32, height: u32) { (**self).resize(width, height) }
}
