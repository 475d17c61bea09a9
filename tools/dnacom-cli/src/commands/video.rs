//! Write the looping video without computing kinematics.

use std::path::PathBuf;

use dnacom_common::config::AppConfig;
use dnacom_common::DnacomError;
use dnacom_processing_core::extract_centroids;
use dnacom_render_engine::{
    annotate_stack, export_video, grayscale_stack, IntensityScale, VideoOptions,
};
use dnacom_stack_model::load_stack;

pub fn run(
    stack_path: PathBuf,
    output: Option<PathBuf>,
    grayscale: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("Rendering video for: {}", stack_path.display());

    let stack = load_stack(&stack_path).map_err(DnacomError::from)?;
    let defaults = &config.analysis;

    let frames = if grayscale {
        grayscale_stack(&stack, IntensityScale::from_stack(&stack))
    } else {
        let centroids = extract_centroids(&stack)?;
        println!("  Located {} centroids", centroids.len());
        annotate_stack(&stack, &centroids, defaults.highlight_rgb)?
    };

    let output = output.unwrap_or_else(|| {
        config
            .output_dir
            .join(defaults.video_format.default_file_name())
    });
    let written = export_video(&frames, &output, &VideoOptions::from(defaults), None)?;

    println!(
        "  Wrote {} frames ({} ms apart, looping) to: {}",
        frames.frame_count(),
        defaults.frame_delay_ms,
        written.display()
    );
    Ok(())
}
