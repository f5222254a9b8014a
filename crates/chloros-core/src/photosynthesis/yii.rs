use ndarray::{s, Array2, Array3, Array4, Axis};
use tracing::{debug, info};

use crate::error::{ChlorosError, Result};
use crate::fluor::{EfficiencyMap, FluorStack, Protocol};
use crate::mask::check_binary_mask;
use crate::outputs::{AnalysisContext, Datatype, ObsValue};
use crate::photosynthesis::histogram::{build_histogram, HistogramFigure};
use crate::visual;

/// Method identifier recorded with every observation.
const METHOD: &str = "chloros.photosynthesis.analyze_yii";

/// Compute and analyze PSII efficiency estimates from a fluorescence stack.
///
/// Masks the stack, derives the per-pixel YII ratio for the stack's
/// protocol, and records median, mode, max, and histogram observations per
/// measurement into `ctx`. Diagnostic visuals (one histogram per measurement
/// plus a paneled rendering of the full map) go through `ctx.debug`.
///
/// Returns the efficiency map and the LAST measurement's histogram figure;
/// the per-measurement observation records cover the rest.
///
/// Masked-out pixels and degenerate divisions yield NaN in the map. They are
/// not errors and are excluded from every aggregate statistic.
pub fn analyze_yii(
    stack: &FluorStack,
    mask: &Array2<u8>,
    measurement_labels: Option<&[String]>,
    sample: &str,
    ctx: &mut AnalysisContext,
) -> Result<(EfficiencyMap, HistogramFigure)> {
    check_binary_mask(mask, (stack.height(), stack.width()))?;

    if let Some(labels) = measurement_labels {
        if labels.len() != stack.measurement_count() {
            return Err(ChlorosError::LabelCountMismatch {
                expected: stack.measurement_count(),
                actual: labels.len(),
            });
        }
    }

    info!(
        protocol = %stack.protocol,
        measurements = stack.measurement_count(),
        sample,
        "Analyzing YII"
    );
    ctx.debug.next_device();

    let masked = mask_stack(stack, mask);

    let (peak_label, base_label) = stack.protocol.frame_pair();
    let peak = stack.frame_index(peak_label)?;
    let base = stack.frame_index(base_label)?;

    let yii = match stack.protocol {
        // One conceptual timepoint; the ratio still vectorizes over whatever
        // measurement axis exists.
        Protocol::DarkAdapted => frame_pair_ratio(&masked, peak, base),
        // A distinct physical Fmp/Fp pair per timepoint: compute each
        // measurement slice independently.
        Protocol::LightAdapted => {
            let (h, w, _, m) = masked.dim();
            let mut out = Array3::<f32>::zeros((h, w, m));
            for mi in 0..m {
                out.index_axis_mut(Axis(2), mi)
                    .assign(&frame_pair_ratio_at(&masked, peak, base, mi));
            }
            out
        }
    };

    let mut last_figure = None;
    for mi in 0..stack.measurement_count() {
        let mlabel = match measurement_labels {
            Some(labels) => labels[mi].as_str(),
            None => stack.measurements[mi].as_str(),
        };

        let valid: Vec<f32> = yii
            .index_axis(Axis(2), mi)
            .iter()
            .copied()
            .filter(|v| *v > 0.0)
            .collect();

        let median = sample_median(&mut valid.clone());
        let mode = sample_mode(&valid);
        let max = sample_max(&valid);
        debug!(
            measurement = mlabel,
            pixels = valid.len(),
            "Computed measurement statistics"
        );

        let (table, figure) = build_histogram(valid.iter().copied(), mlabel);

        ctx.outputs.add_observation(
            sample,
            &format!("yii_median_{mlabel}"),
            "median yii value",
            METHOD,
            "none",
            Datatype::Float,
            ObsValue::Float(median as f64),
            ObsValue::none(),
        );
        ctx.outputs.add_observation(
            sample,
            &format!("yii_mode_{mlabel}"),
            "mode yii value",
            METHOD,
            "none",
            Datatype::Float,
            ObsValue::Float(mode as f64),
            ObsValue::none(),
        );
        ctx.outputs.add_observation(
            sample,
            &format!("yii_max_{mlabel}"),
            "peak yii value",
            METHOD,
            "none",
            Datatype::Float,
            ObsValue::Float(max as f64),
            ObsValue::none(),
        );
        let edge_labels: Vec<f32> = table
            .edges()
            .iter()
            .map(|e| (e * 100.0).round() / 100.0)
            .collect();
        ctx.outputs.add_observation(
            sample,
            &format!("yii_hist_{mlabel}"),
            "yii frequencies",
            METHOD,
            "none",
            Datatype::List,
            ObsValue::Counts(table.counts()),
            ObsValue::Edges(edge_labels),
        );

        visual::debug_histogram(&figure, &ctx.debug)?;
        last_figure = Some(figure);
    }

    let map = EfficiencyMap {
        data: yii,
        measurements: stack.measurements.clone(),
    };

    visual::debug_efficiency_map(&map, &ctx.debug)?;
    ctx.outputs.images.push(map.clone());

    let figure = last_figure.ok_or(ChlorosError::EmptyAxis {
        axis: "measurement",
    })?;
    Ok((map, figure))
}

/// Cast-and-mask: every pixel where the mask is zero becomes NaN across all
/// (frame, measurement) slices.
fn mask_stack(stack: &FluorStack, mask: &Array2<u8>) -> Array4<f32> {
    let mut masked = stack.data.clone();
    for ((r, c), &m) in mask.indexed_iter() {
        if m == 0 {
            masked.slice_mut(s![r, c, .., ..]).fill(f32::NAN);
        }
    }
    masked
}

/// (peak − base) / peak at every pixel, across all measurements.
fn frame_pair_ratio(masked: &Array4<f32>, peak: usize, base: usize) -> Array3<f32> {
    let (h, w, _, m) = masked.dim();
    let mut out = Array3::<f32>::zeros((h, w, m));
    for mi in 0..m {
        for r in 0..h {
            for c in 0..w {
                let p = masked[[r, c, peak, mi]];
                let b = masked[[r, c, base, mi]];
                out[[r, c, mi]] = (p - b) / p;
            }
        }
    }
    out
}

/// (peak − base) / peak at every pixel of a single measurement slice.
fn frame_pair_ratio_at(
    masked: &Array4<f32>,
    peak: usize,
    base: usize,
    measurement: usize,
) -> Array2<f32> {
    let (h, w, _, _) = masked.dim();
    let mut out = Array2::<f32>::zeros((h, w));
    for r in 0..h {
        for c in 0..w {
            let p = masked[[r, c, peak, measurement]];
            let b = masked[[r, c, base, measurement]];
            out[[r, c]] = (p - b) / p;
        }
    }
    out
}

/// Median via partial selection. NaN for an empty sample.
fn sample_median(values: &mut [f32]) -> f32 {
    let n = values.len();
    if n == 0 {
        return f32::NAN;
    }
    if n % 2 == 1 {
        *values
            .select_nth_unstable_by(n / 2, |a, b| a.total_cmp(b))
            .1
    } else {
        let mid = n / 2;
        values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        values[..mid].select_nth_unstable_by(mid - 1, |a, b| a.total_cmp(b));
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Most frequent value; ties resolve to the smallest. NaN for an empty
/// sample.
fn sample_mode(values: &[f32]) -> f32 {
    if values.is_empty() {
        return f32::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best = sorted[0];
    let mut best_run = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_run {
            best_run = j - i;
            best = sorted[i];
        }
        i = j;
    }
    best
}

/// Elementwise maximum. NaN for an empty sample.
fn sample_max(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::NAN, f32::max)
}
