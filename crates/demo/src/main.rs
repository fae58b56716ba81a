// File: crates/demo/src/main.rs
// Summary: Demo prepares every chart in a backtest result at all resolutions and renders one PNG per resolution.

mod input;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use resolution_core::{clean_signals, ChartController, EngineOptions, Prepared};
use resolution_render_skia::{RenderOptions, SkiaSurface, Theme};
use tracing_subscriber::EnvFilter;

struct Args {
    input: PathBuf,
    symbol: Option<String>,
    out: PathBuf,
    theme: Theme,
}

const USAGE: &str = "usage: resolution-demo <results.json|ohlc.csv> [--symbol SYM] [--out DIR] [--theme dark|light]";

fn parse_args() -> Result<Args> {
    let mut it = std::env::args().skip(1);
    let mut input = None;
    let mut symbol = None;
    let mut out = PathBuf::from("target/out");
    let mut theme = Theme::dark();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--symbol" => symbol = Some(it.next().context("--symbol needs a value")?),
            "--out" => out = PathBuf::from(it.next().context("--out needs a value")?),
            "--theme" => theme = resolution_render_skia::theme::find(&it.next().context("--theme needs a value")?),
            "-h" | "--help" => anyhow::bail!(USAGE),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            other => anyhow::bail!("unexpected argument '{other}'\n{USAGE}"),
        }
    }
    let input = input.context(USAGE)?;
    Ok(Args { input, symbol, out, theme })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    if !args.input.exists() {
        anyhow::bail!("file not found: {}", args.input.display());
    }
    tracing::info!(input = %args.input.display(), "using input file");

    let loaded = input::load(&args.input, args.symbol.as_deref())?;
    let signals = clean_signals(&loaded.signals);

    let mut controller = ChartController::new(EngineOptions::default());
    let mut written = 0usize;
    for chart in loaded.charts {
        let surface = SkiaSurface::new(RenderOptions { theme: args.theme, ..RenderOptions::default() });
        controller.attach(chart.id.clone(), Box::new(surface.clone()));

        let resolutions = match controller.prepare(&chart.id, &chart.raw) {
            Ok(Prepared::Ready { resolutions, .. }) => resolutions,
            Ok(Prepared::NoData) => {
                tracing::warn!(chart = %chart.id, "not enough data to chart; skipped");
                controller.dispose(&chart.id)?;
                continue;
            }
            Err(e) => {
                tracing::warn!(chart = %chart.id, error = %e, "chart rejected");
                controller.dispose(&chart.id)?;
                continue;
            }
        };
        controller.set_signals(&chart.id, signals.clone(), chart.symbol.clone())?;

        for res in resolutions {
            controller.set_resolution(&chart.id, res.name())?;
            surface.set_title(format!("{} {}", chart.id, res));
            let out = out_path(&args.out, &chart.id, res.name());
            surface
                .render_to_png(&out)
                .with_context(|| format!("rendering {}", out.display()))?;
            tracing::info!(
                chart = %chart.id,
                resolution = %res,
                points = surface.point_count(),
                markers = surface.markers().len(),
                file = %out.display(),
                "wrote chart"
            );
            written += 1;
        }
        controller.dispose(&chart.id)?;
    }

    if written == 0 {
        anyhow::bail!("no charts rendered; check the input columns");
    }
    tracing::info!(files = written, out = %args.out.display(), "done");
    Ok(())
}

/// `<out>/chart_<id>_<resolution>.png`, with path-hostile characters in the id replaced.
fn out_path(dir: &Path, chart_id: &str, resolution: &str) -> PathBuf {
    let id: String = chart_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    dir.join(format!("chart_{id}_{resolution}.png"))
}
