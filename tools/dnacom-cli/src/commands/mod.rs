pub mod analyze;
pub mod config;
pub mod histogram;
pub mod info;
pub mod video;

use std::path::{Path, PathBuf};

use clap::Args;
use dnacom_common::DnacomError;
use dnacom_stack_model::{FixedInterval, LoadedAcquisition, TimestampSequence, TimestampSource};

/// Where frame timestamps come from.
#[derive(Debug, Clone, Args)]
pub struct TimingArgs {
    /// Acquisition metadata file listing per-frame timestamps or a cycle time
    #[arg(long, conflicts_with = "interval")]
    pub metadata: Option<PathBuf>,

    /// Constant frame interval in seconds
    #[arg(long)]
    pub interval: Option<f64>,
}

/// Load the stack, plus its metadata when timing comes from a file.
pub fn load_acquisition(stack: &Path, timing: &TimingArgs) -> anyhow::Result<LoadedAcquisition> {
    Ok(LoadedAcquisition::load(stack, timing.metadata.as_deref()).map_err(DnacomError::from)?)
}

/// Timestamps for every frame of `acquisition`.
pub fn resolve_timestamps(
    acquisition: &LoadedAcquisition,
    timing: &TimingArgs,
) -> anyhow::Result<TimestampSequence> {
    let frames = acquisition.stack.frame_count();
    let timestamps = match (timing.interval, &acquisition.metadata) {
        (Some(secs), _) => FixedInterval::new(secs).timestamps(frames),
        (None, Some(metadata)) => metadata.timestamps(frames),
        (None, None) => anyhow::bail!("frame timing is required: pass --metadata or --interval"),
    };
    Ok(timestamps.map_err(DnacomError::from)?)
}
