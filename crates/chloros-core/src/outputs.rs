use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::fluor::EfficiencyMap;

/// Tag describing the payload type of an observation value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    Float,
    List,
}

/// Value (or label) payload of an observation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObsValue {
    Float(f64),
    Counts(Vec<u64>),
    Edges(Vec<f32>),
    Text(String),
}

impl ObsValue {
    /// The conventional placeholder for observations without a label.
    pub fn none() -> Self {
        Self::Text("none".to_string())
    }
}

/// One measured trait for one sample. Created once, appended to the
/// observation store, never mutated.
#[derive(Clone, Debug, Serialize)]
pub struct Observation {
    pub sample: String,
    pub variable: String,
    #[serde(rename = "trait")]
    pub trait_: String,
    pub method: String,
    pub scale: String,
    pub datatype: Datatype,
    pub value: ObsValue,
    pub label: ObsValue,
}

/// Append-only store for observations and images of interest, passed into
/// analyzers by the caller.
#[derive(Debug, Default)]
pub struct Outputs {
    pub observations: Vec<Observation>,
    pub images: Vec<EfficiencyMap>,
}

impl Outputs {
    #[allow(clippy::too_many_arguments)]
    pub fn add_observation(
        &mut self,
        sample: &str,
        variable: &str,
        trait_: &str,
        method: &str,
        scale: &str,
        datatype: Datatype,
        value: ObsValue,
        label: ObsValue,
    ) {
        self.observations.push(Observation {
            sample: sample.to_string(),
            variable: variable.to_string(),
            trait_: trait_.to_string(),
            method: method.to_string(),
            scale: scale.to_string(),
            datatype,
            value,
            label,
        });
    }

    /// Persist the recorded observations as a JSON array.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.observations)?;
        Ok(())
    }
}

/// Whether analyzers write their diagnostic visuals to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DebugMode {
    #[default]
    None,
    Print,
}

/// Where and how diagnostic visuals are written. The device counter
/// increments once per analyzer call and prefixes every file it emits.
#[derive(Clone, Debug, Default)]
pub struct DebugParams {
    pub mode: DebugMode,
    pub outdir: PathBuf,
    pub device: u32,
}

impl DebugParams {
    /// Debug parameters that save visuals into `outdir`.
    pub fn print_to(outdir: &Path) -> Self {
        Self {
            mode: DebugMode::Print,
            outdir: outdir.to_path_buf(),
            device: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self.mode, DebugMode::Print)
    }

    pub fn next_device(&mut self) {
        self.device += 1;
    }

    /// Output path for a visual: `{device}_{stem}.png` inside `outdir`.
    pub fn visual_path(&self, stem: &str) -> PathBuf {
        self.outdir.join(format!("{}_{}.png", self.device, stem))
    }
}

/// Explicit per-run state handed to analyzers: the observation store plus
/// debug output settings.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub outputs: Outputs,
    pub debug: DebugParams,
}
