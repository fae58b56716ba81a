// File: crates/resolution-render-skia/src/draw.rs
// Summary: Raster drawing of the active dataset (line or candles), grid, labels and trade markers.

use resolution_core::{Marker, MarkerPosition, OhlcPoint, SeriesData, TimePoint};
use skia_safe as skia;

use crate::theme::Theme;

/// Screen margins, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(72, 24, 24, 56)
    }
}

/// Data-to-pixel mapping for one frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Plot {
    pub l: f32,
    pub t: f32,
    pub r: f32,
    pub b: f32,
    x_min: f64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl Plot {
    /// Fit the plot area to `data`; `None` when there is nothing to draw.
    pub fn fit(data: &SeriesData, width: u32, height: u32, insets: &Insets) -> Option<Self> {
        let (y_lo, y_hi) = data.value_range()?;
        let first = data.time_at(0)?;
        let last = data.time_at(data.len() - 1)?;
        let margin = (y_hi - y_lo) * 0.02;
        let l = insets.left as f32;
        let t = insets.top as f32;
        let r = (width.saturating_sub(insets.right) as f32).max(l + 1.0);
        let b = (height.saturating_sub(insets.bottom) as f32).max(t + 1.0);
        Some(Self {
            l, t, r, b,
            x_min: first as f64,
            x_span: ((last - first) as f64).max(1e-9),
            y_min: y_lo - margin,
            y_span: ((y_hi + margin) - (y_lo - margin)).max(1e-9),
        })
    }

    pub fn sx(&self, time: i64) -> f32 {
        self.l + ((time as f64 - self.x_min) / self.x_span) as f32 * (self.r - self.l)
    }

    pub fn sy(&self, value: f64) -> f32 {
        self.b - ((value - self.y_min) / self.y_span) as f32 * (self.b - self.t)
    }
}

pub(crate) fn draw_grid(canvas: &skia::Canvas, plot: &Plot, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    for i in 0..10 {
        let x = plot.l + (plot.r - plot.l) * i as f32 / 9.0;
        canvas.draw_line((x, plot.t), (x, plot.b), &paint);
    }
    for i in 0..6 {
        let y = plot.t + (plot.b - plot.t) * i as f32 / 5.0;
        canvas.draw_line((plot.l, y), (plot.r, y), &paint);
    }

    let mut axis = skia::Paint::default();
    axis.set_color(theme.axis_line);
    axis.set_anti_alias(true);
    axis.set_stroke_width(1.5);
    canvas.draw_line((plot.l, plot.b), (plot.r, plot.b), &axis);
    canvas.draw_line((plot.l, plot.t), (plot.l, plot.b), &axis);
}

/// Resolution name in the top-left corner of the plot.
pub(crate) fn draw_title(canvas: &skia::Canvas, plot: &Plot, theme: &Theme, title: &str) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.axis_label);
    let mut font = skia::Font::default();
    font.set_size(14.0);
    canvas.draw_str(title, (plot.l + 8.0, plot.t + 16.0), &font, &paint);
}

pub(crate) fn draw_line_series(canvas: &skia::Canvas, plot: &Plot, theme: &Theme, data: &[TimePoint]) {
    if data.len() < 2 {
        return;
    }
    let mut path = skia::Path::new();
    path.move_to((plot.sx(data[0].time), plot.sy(data[0].value)));
    for p in &data[1..] {
        path.line_to((plot.sx(p.time), plot.sy(p.value)));
    }

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(2.0);
    stroke.set_color(theme.line_stroke);
    canvas.draw_path(&path, &stroke);
}

pub(crate) fn draw_candle_series(canvas: &skia::Canvas, plot: &Plot, theme: &Theme, data: &[OhlcPoint]) {
    if data.is_empty() {
        return;
    }
    let mut wick = skia::Paint::default();
    wick.set_anti_alias(true);
    wick.set_style(skia::paint::Style::Stroke);
    wick.set_stroke_width(1.0);

    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);

    // body width: ~70% of one bar slot
    let bar_px = ((plot.r - plot.l) / data.len() as f32).max(3.0) * 0.7;
    let half = bar_px * 0.5;

    for c in data {
        let x = plot.sx(c.time);
        let color = if c.close >= c.open { theme.candle_up } else { theme.candle_down };
        wick.set_color(color);
        body.set_color(color);

        canvas.draw_line((x, plot.sy(c.high)), (x, plot.sy(c.low)), &wick);

        let (y_o, y_c) = (plot.sy(c.open), plot.sy(c.close));
        let top = y_o.min(y_c);
        let bot = y_o.max(y_c);
        canvas.draw_rect(skia::Rect::from_ltrb(x - half, top, x + half, bot.max(top + 1.0)), &body);
    }
}

/// Bar extremes at `time`: (low, high) for candles, (value, value) for lines.
fn anchor(data: &SeriesData, time: i64) -> Option<(f64, f64)> {
    match data {
        SeriesData::Line(v) => v
            .binary_search_by_key(&time, |p| p.time)
            .ok()
            .map(|i| (v[i].value, v[i].value)),
        SeriesData::Candle(v) => v
            .binary_search_by_key(&time, |c| c.time)
            .ok()
            .map(|i| (v[i].low, v[i].high)),
    }
}

pub(crate) fn draw_markers(
    canvas: &skia::Canvas,
    plot: &Plot,
    theme: &Theme,
    data: &SeriesData,
    markers: &[Marker],
    labels: bool,
) {
    const SIZE: f32 = 7.0;
    const GAP: f32 = 6.0;

    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_style(skia::paint::Style::Fill);
    let mut font = skia::Font::default();
    font.set_size(11.0);

    for m in markers {
        let Some((low, high)) = anchor(data, m.time) else { continue };
        let x = plot.sx(m.time);
        let mut path = skia::Path::new();
        let label_y = match m.position {
            MarkerPosition::BelowBar => {
                fill.set_color(theme.marker_buy);
                let tip = plot.sy(low) + GAP;
                path.move_to((x, tip));
                path.line_to((x - SIZE, tip + SIZE * 1.5));
                path.line_to((x + SIZE, tip + SIZE * 1.5));
                tip + SIZE * 1.5 + 12.0
            }
            MarkerPosition::AboveBar => {
                fill.set_color(theme.marker_sell);
                let tip = plot.sy(high) - GAP;
                path.move_to((x, tip));
                path.line_to((x - SIZE, tip - SIZE * 1.5));
                path.line_to((x + SIZE, tip - SIZE * 1.5));
                tip - SIZE * 1.5 - 4.0
            }
        };
        path.close();
        canvas.draw_path(&path, &fill);
        if labels {
            canvas.draw_str(m.label, (x - SIZE * 2.0, label_y), &font, &fill);
        }
    }
}
