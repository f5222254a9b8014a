use crate::consts::{YII_HIST_BINS, YII_HIST_MAX, YII_HIST_MIN};

/// One fixed-width histogram bin: a count and the bin's lower edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramBin {
    pub count: u64,
    pub bin_edge: f32,
}

/// Per-measurement histogram of efficiency values.
///
/// The measurement label rides along as metadata; bins always span
/// [`YII_HIST_MIN`, `YII_HIST_MAX`] in [`YII_HIST_BINS`] equal steps.
#[derive(Clone, Debug)]
pub struct HistogramTable {
    pub label: String,
    pub bins: Vec<HistogramBin>,
}

impl HistogramTable {
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn edges(&self) -> Vec<f32> {
        self.bins.iter().map(|b| b.bin_edge).collect()
    }

    /// Lower edge of the highest-count bin. The first bin wins ties.
    pub fn peak_edge(&self) -> f32 {
        let mut best = 0usize;
        for (i, bin) in self.bins.iter().enumerate() {
            if bin.count > self.bins[best].count {
                best = i;
            }
        }
        self.bins[best].bin_edge
    }
}

/// Renderable description of a per-measurement histogram line plot with a
/// peak-bin annotation.
#[derive(Clone, Debug)]
pub struct HistogramFigure {
    pub label: String,
    pub counts: Vec<u64>,
    pub edges: Vec<f32>,
    pub peak_edge: f32,
}

/// Bin the positive values of `values` into the fixed YII histogram.
///
/// Values outside the histogram domain are excluded from the counts; the top
/// edge itself falls in the last bin. NaN and non-positive values never
/// count.
pub fn build_histogram(
    values: impl IntoIterator<Item = f32>,
    label: &str,
) -> (HistogramTable, HistogramFigure) {
    let width = (YII_HIST_MAX - YII_HIST_MIN) / YII_HIST_BINS as f32;
    let mut counts = vec![0u64; YII_HIST_BINS];

    for v in values {
        if v.is_nan() || v <= 0.0 || v > YII_HIST_MAX {
            continue;
        }
        let bin = (((v - YII_HIST_MIN) / width) as usize).min(YII_HIST_BINS - 1);
        counts[bin] += 1;
    }

    let bins: Vec<HistogramBin> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            count,
            bin_edge: YII_HIST_MIN + i as f32 * width,
        })
        .collect();

    let table = HistogramTable {
        label: label.to_string(),
        bins,
    };
    let figure = HistogramFigure {
        label: label.to_string(),
        counts: table.counts(),
        edges: table.edges(),
        peak_edge: table.peak_edge(),
    };
    (table, figure)
}
