//! Extractor → Calculator, in one call.

use dnacom_common::DnacomResult;
use dnacom_stack_model::{Centroid, FrameStack, KinematicsStep, TimestampSequence};
use serde::{Deserialize, Serialize};

use crate::centroid::extract_centroids;
use crate::kinematics::{compute_kinematics, KinematicsSummary};

/// Everything computed from one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// One centroid per frame, in frame order.
    pub centroids: Vec<Centroid>,

    /// Timestamps the kinematics were computed with.
    pub timestamps: TimestampSequence,

    /// `centroids.len() - 1` steps.
    pub kinematics: Vec<KinematicsStep>,

    /// Velocity statistics; absent for a single-frame stack.
    pub summary: Option<KinematicsSummary>,
}

/// Run centroid extraction and kinematics over a whole stack.
///
/// The timestamps must cover exactly the stack's frames.
pub fn analyze(stack: &FrameStack, timestamps: &TimestampSequence) -> DnacomResult<Analysis> {
    let (frames, height, width) = stack.dim();
    tracing::info!(frames, height, width, "Extracting centroids");
    let centroids = extract_centroids(stack)?;

    tracing::info!(span_secs = timestamps.span_secs(), "Computing kinematics");
    let kinematics = compute_kinematics(&centroids, timestamps)?;
    let summary = KinematicsSummary::from_steps(&kinematics);

    Ok(Analysis {
        centroids,
        timestamps: timestamps.clone(),
        kinematics,
        summary,
    })
}
