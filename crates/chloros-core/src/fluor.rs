use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, Array4, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ChlorosError, Result};

/// Fluorescence acquisition protocol, resolved once from the stack's
/// acquisition-mode tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    DarkAdapted,
    LightAdapted,
}

impl Protocol {
    /// Frame labels paired by the efficiency formula: (numerator peak, base).
    pub fn frame_pair(&self) -> (&'static str, &'static str) {
        match self {
            Self::DarkAdapted => ("Fm", "F0"),
            Self::LightAdapted => ("Fmp", "Fp"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ChlorosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "darkadapted" => Ok(Self::DarkAdapted),
            "lightadapted" => Ok(Self::LightAdapted),
            _ => Err(ChlorosError::UnknownProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DarkAdapted => write!(f, "darkadapted"),
            Self::LightAdapted => write!(f, "lightadapted"),
        }
    }
}

/// A labeled 4D fluorescence image stack.
///
/// Axes are (row, col, frame, measurement). `frame_labels` names the
/// flash/exposure frame each slice along the frame axis holds (F0, Fm, Fp,
/// Fmp); `measurements` names the repeated acquisition timepoints.
#[derive(Clone, Debug)]
pub struct FluorStack {
    /// Pixel data, shape = (rows, cols, frames, measurements).
    pub data: Array4<f32>,
    pub frame_labels: Vec<String>,
    pub measurements: Vec<String>,
    pub protocol: Protocol,
}

impl FluorStack {
    /// Build a stack, validating coordinate labels against the array shape.
    /// Every axis must be non-empty.
    pub fn new(
        data: Array4<f32>,
        frame_labels: Vec<String>,
        measurements: Vec<String>,
        protocol: Protocol,
    ) -> Result<Self> {
        let (rows, cols, frames, measures) = data.dim();
        for (axis, len) in [
            ("row", rows),
            ("col", cols),
            ("frame", frames),
            ("measurement", measures),
        ] {
            if len == 0 {
                return Err(ChlorosError::EmptyAxis { axis });
            }
        }
        if frame_labels.len() != frames {
            return Err(ChlorosError::CoordinateMismatch {
                axis: "frame",
                expected: frames,
                actual: frame_labels.len(),
            });
        }
        if measurements.len() != measures {
            return Err(ChlorosError::CoordinateMismatch {
                axis: "measurement",
                expected: measures,
                actual: measurements.len(),
            });
        }
        Ok(Self {
            data,
            frame_labels,
            measurements,
            protocol,
        })
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn frame_count(&self) -> usize {
        self.data.dim().2
    }

    pub fn measurement_count(&self) -> usize {
        self.data.dim().3
    }

    /// Resolve a frame label to its index along the frame axis.
    pub fn frame_index(&self, label: &str) -> Result<usize> {
        self.frame_labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| ChlorosError::FrameLabelNotFound(label.to_string()))
    }
}

/// Per-pixel efficiency estimates, one 2D slice per measurement.
///
/// Valid pixels fall in (0, 1]; masked-out and degenerate pixels are NaN.
/// Carries no frame metadata: the frame axis is consumed by the formula.
#[derive(Clone, Debug)]
pub struct EfficiencyMap {
    /// Pixel data, shape = (rows, cols, measurements).
    pub data: Array3<f32>,
    pub measurements: Vec<String>,
}

impl EfficiencyMap {
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn measurement_count(&self) -> usize {
        self.data.dim().2
    }

    /// 2D view of one measurement slice.
    pub fn slice(&self, measurement: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(2), measurement)
    }
}
