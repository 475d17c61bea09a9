//! Show stack and timing information.

use std::path::PathBuf;

use dnacom_common::DnacomError;
use dnacom_stack_model::{LoadedAcquisition, TimestampSource};

pub fn run(stack_path: PathBuf, metadata: Option<PathBuf>) -> anyhow::Result<()> {
    let acquisition =
        LoadedAcquisition::load(&stack_path, metadata.as_deref()).map_err(DnacomError::from)?;
    let stack = &acquisition.stack;

    println!("Stack: {}", acquisition.stack_path.display());
    println!("  Frames: {}", stack.frame_count());
    println!("  Frame size: {}x{} (rows x cols)", stack.height(), stack.width());
    println!(
        "  Intensity: {} .. {}",
        stack.min_intensity(),
        stack.max_intensity()
    );

    let Some(meta) = &acquisition.metadata else {
        println!();
        println!("Timing: none (pass --metadata, or --interval to analyze)");
        return Ok(());
    };

    println!();
    println!("Metadata:");
    println!("  Entries: {}", meta.entry_count());
    println!("  Frame timestamps: {}", meta.frame_times().len());
    if let Some(cycle) = meta.cycle_time_secs() {
        println!("  Cycle time: {cycle}s");
    }

    match meta.timestamps(stack.frame_count()) {
        Ok(timestamps) => println!(
            "  Span: {:.3}s over {} frames",
            timestamps.span_secs(),
            timestamps.len()
        ),
        Err(e) => println!("  Timing unusable: {e}"),
    }

    Ok(())
}
