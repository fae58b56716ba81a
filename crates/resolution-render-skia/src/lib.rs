// File: crates/resolution-render-skia/src/lib.rs
// Summary: Skia renderer crate; a RenderSurface that rasterises charts to PNG on a CPU surface.

pub mod draw;
pub mod surface;
pub mod theme;

pub use draw::Insets;
pub use surface::{RenderOptions, SkiaSurface, HEIGHT, WIDTH};
pub use theme::Theme;
