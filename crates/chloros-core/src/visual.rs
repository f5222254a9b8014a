use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use plotters::prelude::*;
use tracing::debug;

use crate::consts::{HIST_FIG_SIZE, MAP_PANEL_GAP, MAP_PANEL_WRAP};
use crate::error::{ChlorosError, Result};
use crate::fluor::EfficiencyMap;
use crate::outputs::DebugParams;
use crate::photosynthesis::histogram::HistogramFigure;

/// Render a histogram figure: a line plot of count vs. bin lower edge with a
/// peak-bin annotation, titled with the measurement label.
pub fn save_histogram(fig: &HistogramFigure, path: &Path) -> Result<()> {
    let max_count = fig.counts.iter().copied().max().unwrap_or(0).max(1) as f32;
    let y_max = max_count * 1.05;

    let root = BitMapBackend::new(path, HIST_FIG_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("measurement: {}", fig.label), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f32..1.0f32, 0.0f32..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("photosynthetic efficiency (yii)")
        .y_desc("plant pixels")
        .draw()
        .map_err(render_err)?;

    let points: Vec<(f32, f32)> = fig
        .edges
        .iter()
        .zip(&fig.counts)
        .map(|(&edge, &count)| (edge, count as f32))
        .collect();
    chart
        .draw_series(LineSeries::new(points, &GREEN))
        .map_err(render_err)?;

    chart
        .draw_series(std::iter::once(Text::new(
            format!("Peak bin value: {:.2}", fig.peak_edge),
            (0.15f32, max_count),
            ("sans-serif", 16).into_font().color(&GREEN),
        )))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    debug!(path = %path.display(), "Saved histogram figure");
    Ok(())
}

/// Render the efficiency map as one paneled RGB raster, wrapped
/// [`MAP_PANEL_WRAP`] panels per row.
pub fn save_efficiency_map(map: &EfficiencyMap, path: &Path) -> Result<()> {
    let h = map.height();
    let w = map.width();
    let n = map.measurement_count();
    let cols = n.clamp(1, MAP_PANEL_WRAP);
    let rows = n.div_ceil(cols).max(1);

    let img_w = cols * w + (cols - 1) * MAP_PANEL_GAP;
    let img_h = rows * h + (rows - 1) * MAP_PANEL_GAP;
    let mut img = RgbImage::from_pixel(img_w as u32, img_h as u32, Rgb([255, 255, 255]));

    for mi in 0..n {
        let x0 = (mi % cols) * (w + MAP_PANEL_GAP);
        let y0 = (mi / cols) * (h + MAP_PANEL_GAP);
        let slice = map.slice(mi);
        for r in 0..h {
            for c in 0..w {
                img.put_pixel(
                    (x0 + c) as u32,
                    (y0 + r) as u32,
                    efficiency_color(slice[[r, c]]),
                );
            }
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    debug!(path = %path.display(), panels = n, "Saved efficiency map");
    Ok(())
}

/// Save the histogram figure through the debug settings, named
/// `{device}_yii_{label}_histogram.png`. A no-op unless printing is enabled.
pub fn debug_histogram(fig: &HistogramFigure, params: &DebugParams) -> Result<()> {
    if !params.enabled() {
        return Ok(());
    }
    save_histogram(fig, &params.visual_path(&format!("yii_{}_histogram", fig.label)))
}

/// Save the paneled efficiency map through the debug settings, named
/// `{device}_yii_map.png`. A no-op unless printing is enabled.
pub fn debug_efficiency_map(map: &EfficiencyMap, params: &DebugParams) -> Result<()> {
    if !params.enabled() {
        return Ok(());
    }
    save_efficiency_map(map, &params.visual_path("yii_map"))
}

/// Green ramp for efficiency values; NaN pixels render near-black.
fn efficiency_color(v: f32) -> Rgb<u8> {
    if !v.is_finite() {
        return Rgb([10, 10, 14]);
    }
    let t = v.clamp(0.0, 1.0);
    Rgb([
        (20.0 + 40.0 * t) as u8,
        (40.0 + 200.0 * t) as u8,
        (30.0 + 20.0 * t) as u8,
    ])
}

fn render_err<E: std::fmt::Display>(err: E) -> ChlorosError {
    ChlorosError::Render(err.to_string())
}
