pub mod histogram;
pub mod yii;

pub use histogram::{build_histogram, HistogramBin, HistogramFigure, HistogramTable};
pub use yii::analyze_yii;
