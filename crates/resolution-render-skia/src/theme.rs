// File: crates/resolution-render-skia/src/theme.rs
// Summary: Light/Dark colour sets for series, grid and trade markers.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub line_stroke: skia::Color,
    pub candle_up: skia::Color,
    pub candle_down: skia::Color,
    pub marker_buy: skia::Color,
    pub marker_sell: skia::Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 235, 235, 245),
            line_stroke: skia::Color::from_argb(255, 64, 160, 255),
            candle_up: skia::Color::from_argb(255, 40, 200, 120),
            candle_down: skia::Color::from_argb(255, 220, 80, 80),
            marker_buy: skia::Color::from_argb(255, 38, 166, 154),
            marker_sell: skia::Color::from_argb(255, 239, 83, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            grid: skia::Color::from_argb(255, 230, 230, 235),
            axis_line: skia::Color::from_argb(255, 60, 60, 70),
            axis_label: skia::Color::from_argb(255, 20, 20, 30),
            line_stroke: skia::Color::from_argb(255, 32, 120, 200),
            candle_up: skia::Color::from_argb(255, 20, 160, 90),
            candle_down: skia::Color::from_argb(255, 200, 60, 60),
            marker_buy: skia::Color::from_argb(255, 0, 137, 123),
            marker_sell: skia::Color::from_argb(255, 211, 47, 47),
        }
    }
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    [Theme::dark(), Theme::light()]
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::dark)
}
