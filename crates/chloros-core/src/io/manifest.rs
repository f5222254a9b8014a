use std::fs;
use std::path::Path;

use ndarray::{s, Array4};
use serde::Deserialize;
use tracing::info;

use crate::error::{ChlorosError, Result};
use crate::fluor::{FluorStack, Protocol};

use super::image_io::load_gray;

/// On-disk description of a fluorescence acquisition.
///
/// Frame image paths are resolved relative to the manifest file.
#[derive(Clone, Debug, Deserialize)]
pub struct StackManifest {
    pub protocol: Protocol,
    /// Frame labels shared by every measurement, in slice order.
    pub frames: Vec<String>,
    #[serde(rename = "measurement")]
    pub measurements: Vec<MeasurementEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MeasurementEntry {
    pub label: String,
    /// One image file per frame label, same order as `frames`.
    pub files: Vec<String>,
}

impl StackManifest {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let manifest: StackManifest = toml::from_str(&text)?;

        if manifest.frames.is_empty() {
            return Err(ChlorosError::InvalidManifest(
                "no frame labels listed".to_string(),
            ));
        }
        if manifest.measurements.is_empty() {
            return Err(ChlorosError::InvalidManifest(
                "no measurements listed".to_string(),
            ));
        }
        for entry in &manifest.measurements {
            if entry.files.len() != manifest.frames.len() {
                return Err(ChlorosError::InvalidManifest(format!(
                    "measurement {:?} lists {} files for {} frame labels",
                    entry.label,
                    entry.files.len(),
                    manifest.frames.len()
                )));
            }
        }
        Ok(manifest)
    }

    /// Total number of image files the manifest references.
    pub fn frame_file_count(&self) -> usize {
        self.frames.len() * self.measurements.len()
    }
}

/// Load the full stack described by a manifest file.
pub fn load_stack(manifest_path: &Path) -> Result<FluorStack> {
    let manifest = StackManifest::from_path(manifest_path)?;
    load_stack_with(&manifest, manifest_path, |_| {})
}

/// Load a parsed manifest's frames, reporting each loaded file through
/// `on_frame` (used by the CLI progress bar).
pub fn load_stack_with<F>(
    manifest: &StackManifest,
    manifest_path: &Path,
    mut on_frame: F,
) -> Result<FluorStack>
where
    F: FnMut(usize),
{
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let mut data: Option<Array4<f32>> = None;
    let mut loaded = 0usize;

    for (mi, entry) in manifest.measurements.iter().enumerate() {
        for (fi, file) in entry.files.iter().enumerate() {
            let frame = load_gray(&base.join(file))?;
            let (h, w) = frame.dim();

            let arr = data.get_or_insert_with(|| {
                Array4::zeros((h, w, manifest.frames.len(), manifest.measurements.len()))
            });
            let (rows, cols, _, _) = arr.dim();
            if (h, w) != (rows, cols) {
                return Err(ChlorosError::InvalidManifest(format!(
                    "frame {file:?} is {h}x{w}, expected {rows}x{cols}"
                )));
            }

            arr.slice_mut(s![.., .., fi, mi]).assign(&frame);
            loaded += 1;
            on_frame(loaded);
        }
    }

    let data = data.ok_or_else(|| {
        ChlorosError::InvalidManifest("manifest references no frame files".to_string())
    })?;
    info!(frames = loaded, "Loaded fluorescence stack");

    FluorStack::new(
        data,
        manifest.frames.clone(),
        manifest.measurements.iter().map(|m| m.label.clone()).collect(),
        manifest.protocol,
    )
}
