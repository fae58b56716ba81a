// File: crates/resolution-render-skia/src/surface.rs
// Summary: SkiaSurface implements the engine's RenderSurface and renders the current frame to PNG on demand.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use resolution_core::{Marker, RenderSurface, SeriesData, SeriesKind};
use skia_safe as skia;

use crate::draw::{draw_candle_series, draw_grid, draw_line_series, draw_markers, draw_title, Insets, Plot};
use crate::theme::Theme;

/// Default surface width in pixels.
pub const WIDTH: u32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: u32 = 640;

pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
    pub theme: Theme,
    /// Draw text (title, marker labels). Off for pixel-stable output.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            theme: Theme::dark(),
            draw_labels: true,
        }
    }
}

struct State {
    opts: RenderOptions,
    kind: Option<SeriesKind>,
    data: Option<SeriesData>,
    markers: Vec<Marker>,
    title: String,
}

/// Cloneable handle: the controller owns one clone, the caller keeps another
/// to render frames. All clones share one state.
#[derive(Clone)]
pub struct SkiaSurface {
    state: Rc<RefCell<State>>,
}

impl SkiaSurface {
    pub fn new(opts: RenderOptions) -> Self {
        let state = State { opts, kind: None, data: None, markers: Vec::new(), title: String::new() };
        Self { state: Rc::new(RefCell::new(state)) }
    }

    /// Caption drawn in the plot corner (e.g. "BTCUSDC 4h").
    pub fn set_title(&self, title: impl Into<String>) {
        self.state.borrow_mut().title = title.into();
    }

    pub fn size(&self) -> (u32, u32) {
        let s = self.state.borrow();
        (s.opts.width, s.opts.height)
    }

    pub fn kind(&self) -> Option<SeriesKind> { self.state.borrow().kind }

    pub fn point_count(&self) -> usize {
        self.state.borrow().data.as_ref().map_or(0, SeriesData::len)
    }

    pub fn markers(&self) -> Vec<Marker> { self.state.borrow().markers.clone() }

    /// Rasterise the current frame and encode it as PNG.
    pub fn render_png_bytes(&self) -> Result<Vec<u8>> {
        let s = self.state.borrow();
        let w = i32::try_from(s.opts.width)?;
        let h = i32::try_from(s.opts.height)?;
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        let canvas = surface.canvas();
        let theme = &s.opts.theme;
        canvas.clear(theme.background);

        if let Some(data) = s.data.as_ref() {
            if let Some(plot) = Plot::fit(data, s.opts.width, s.opts.height, &s.opts.insets) {
                draw_grid(canvas, &plot, theme);
                match data {
                    SeriesData::Line(pts) => draw_line_series(canvas, &plot, theme, pts),
                    SeriesData::Candle(pts) => draw_candle_series(canvas, &plot, theme, pts),
                }
                draw_markers(canvas, &plot, theme, data, &s.markers, s.opts.draw_labels);
                if s.opts.draw_labels && !s.title.is_empty() {
                    draw_title(canvas, &plot, theme, &s.title);
                }
            }
        }

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let png = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(png.as_bytes().to_vec())
    }

    /// Render the current frame to a PNG at `path`.
    pub fn render_to_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_png_bytes()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl RenderSurface for SkiaSurface {
    fn add_series(&mut self, kind: SeriesKind) {
        let mut s = self.state.borrow_mut();
        s.kind = Some(kind);
        s.data = Some(SeriesData::empty(kind));
        s.markers.clear();
    }

    fn set_data(&mut self, data: &SeriesData) {
        let mut s = self.state.borrow_mut();
        if s.kind.is_some_and(|k| k != data.kind()) {
            tracing::warn!(expected = ?s.kind, got = ?data.kind(), "data kind differs from the added series");
        }
        s.kind = Some(data.kind());
        s.data = Some(data.clone());
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.state.borrow_mut().markers = markers.to_vec();
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut s = self.state.borrow_mut();
        s.opts.width = width.max(1);
        s.opts.height = height.max(1);
    }
}
