//! Write only the velocity histograms.

use std::path::PathBuf;

use dnacom_common::config::{AppConfig, BinRule};
use dnacom_processing_core::analyze;
use dnacom_render_engine::{velocity_histograms, write_histograms};
use dnacom_stack_model::VelocityAxis;

use super::{load_acquisition, resolve_timestamps, TimingArgs};

pub fn run(
    stack_path: PathBuf,
    timing: TimingArgs,
    output: Option<PathBuf>,
    bins: Option<BinRule>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("Building velocity histograms for: {}", stack_path.display());

    let acquisition = load_acquisition(&stack_path, &timing)?;
    let timestamps = resolve_timestamps(&acquisition, &timing)?;
    let analysis = analyze(&acquisition.stack, &timestamps)?;

    let rule = bins.unwrap_or(config.analysis.histogram_bins);
    let histograms = velocity_histograms(&analysis.kinematics, rule)?;
    let out_dir = output.unwrap_or_else(|| config.output_dir.clone());
    let artifacts = write_histograms(&histograms, &out_dir)?;

    for axis in VelocityAxis::BOTH {
        let h = histograms.axis(axis);
        let (lo, hi) = h.range();
        println!(
            "  {}: {} bins over [{:.3}, {:.3}] px/s, tallest bin {}",
            axis.label(),
            h.bin_count(),
            lo,
            hi,
            h.max_count()
        );
    }
    println!("  Wrote: {}", artifacts.x.display());
    println!("  Wrote: {}", artifacts.y.display());

    Ok(())
}
