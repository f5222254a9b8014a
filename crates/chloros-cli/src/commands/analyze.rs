use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use chloros_core::io::{load_mask, load_stack_with, StackManifest};
use chloros_core::outputs::{AnalysisContext, DebugParams};
use chloros_core::photosynthesis::analyze_yii;

use crate::summary;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Stack manifest file (TOML)
    pub manifest: PathBuf,

    /// Binary plant mask image
    #[arg(long)]
    pub mask: PathBuf,

    /// Output directory for observations and visuals
    #[arg(long, default_value = "chloros-out")]
    pub outdir: PathBuf,

    /// Sample identifier recorded with each observation
    #[arg(long, default_value = "default")]
    pub sample: String,

    /// Override the per-measurement labels (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let manifest = StackManifest::from_path(&args.manifest)?;

    let pb = ProgressBar::new(manifest.frame_file_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Loading frames");

    let stack = load_stack_with(&manifest, &args.manifest, |loaded| {
        pb.set_position(loaded as u64);
    })?;
    pb.finish_with_message("Frames loaded");

    let mask = load_mask(&args.mask)?;

    std::fs::create_dir_all(&args.outdir)?;
    let mut ctx = AnalysisContext {
        debug: DebugParams::print_to(&args.outdir),
        ..Default::default()
    };

    let (map, _last_hist) = analyze_yii(
        &stack,
        &mask,
        args.labels.as_deref(),
        &args.sample,
        &mut ctx,
    )?;

    let results = args.outdir.join("observations.json");
    ctx.outputs.save_json(&results)?;

    summary::print_analysis_summary(
        &args.sample,
        &stack,
        &map,
        ctx.outputs.observations.len(),
        &args.outdir,
    );
    Ok(())
}
