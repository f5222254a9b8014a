use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use chloros_core::io::StackManifest;

#[derive(Args)]
pub struct InfoArgs {
    /// Stack manifest file (TOML)
    pub manifest: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let manifest = StackManifest::from_path(&args.manifest)?;

    println!("Manifest:      {}", args.manifest.display());
    println!("Protocol:      {}", manifest.protocol);
    println!("Frame labels:  {}", manifest.frames.join(", "));
    println!("Measurements:  {}", manifest.measurements.len());
    for entry in &manifest.measurements {
        println!("  {:<12} {} frames", entry.label, entry.files.len());
    }
    println!("Total files:   {}", manifest.frame_file_count());

    Ok(())
}
