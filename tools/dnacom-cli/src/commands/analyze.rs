//! Run the whole pipeline on one stack.

use std::path::PathBuf;

use dnacom_common::config::{AppConfig, BinRule};
use dnacom_processing_core::{analyze, Analysis};
use dnacom_render_engine::{
    annotate_stack, export_video, velocity_histograms, write_histograms, VideoOptions,
};
use dnacom_stack_model::VelocityAxis;

use super::{load_acquisition, resolve_timestamps, TimingArgs};

pub fn run(
    stack_path: PathBuf,
    timing: TimingArgs,
    output: Option<PathBuf>,
    bins: Option<BinRule>,
    json: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if !json {
        println!("Analyzing stack: {}", stack_path.display());
    }

    let acquisition = load_acquisition(&stack_path, &timing)?;
    let timestamps = resolve_timestamps(&acquisition, &timing)?;
    let analysis = analyze(&acquisition.stack, &timestamps)?;

    let out_dir = output.unwrap_or_else(|| config.output_dir.clone());
    let defaults = &config.analysis;

    // Bin before writing anything, so a stack too short for velocities
    // leaves no partial output behind.
    let rule = bins.unwrap_or(defaults.histogram_bins);
    let binned = velocity_histograms(&analysis.kinematics, rule)?;

    let annotated = annotate_stack(
        &acquisition.stack,
        &analysis.centroids,
        defaults.highlight_rgb,
    )?;
    let video_path = out_dir.join(defaults.video_format.default_file_name());
    let video = export_video(&annotated, &video_path, &VideoOptions::from(defaults), None)?;

    let histograms = write_histograms(&binned, &out_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print_summary(&analysis);
    println!();
    println!("Outputs:");
    println!("  Video: {}", video.display());
    println!("  Histogram (x): {}", histograms.x.display());
    println!("  Histogram (y): {}", histograms.y.display());
    println!("\nAnalysis complete.");

    Ok(())
}

fn print_summary(analysis: &Analysis) {
    println!("  Frames: {}", analysis.centroids.len());
    println!("  Duration: {:.3}s", analysis.timestamps.span_secs());

    if let (Some(first), Some(last)) = (analysis.centroids.first(), analysis.centroids.last()) {
        println!("  Start: (row {:.2}, col {:.2})", first.row, first.col);
        println!("  End: (row {:.2}, col {:.2})", last.row, last.col);
    }

    let Some(summary) = &analysis.summary else {
        return;
    };
    println!("  Path length: {:.2} px", summary.path_length);
    println!("  Mean speed: {:.2} px/s", summary.mean_speed);
    println!();

    println!("Velocity (px/s):");
    for axis in VelocityAxis::BOTH {
        let s = summary.axis(axis);
        println!(
            "  {}: mean {:.3}, std {:.3}, min {:.3}, max {:.3}",
            axis.label(),
            s.mean,
            s.std_dev,
            s.min,
            s.max
        );
    }
}
