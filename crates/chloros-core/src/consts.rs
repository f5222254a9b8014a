/// Number of equal-width bins in the YII histogram.
pub const YII_HIST_BINS: usize = 100;

/// Lower edge of the YII histogram domain.
pub const YII_HIST_MIN: f32 = 0.0;

/// Upper edge of the YII histogram domain. Values above this are excluded
/// from the counts; the edge itself falls in the last bin.
pub const YII_HIST_MAX: f32 = 1.0;

/// Rendered histogram figure size in pixels (width, height).
pub const HIST_FIG_SIZE: (u32, u32) = (800, 600);

/// Panels per row in the combined efficiency-map rendering.
pub const MAP_PANEL_WRAP: usize = 4;

/// Pixel gap between panels in the combined efficiency-map rendering.
pub const MAP_PANEL_GAP: usize = 4;
