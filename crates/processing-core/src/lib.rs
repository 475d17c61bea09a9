//! dnacom Processing Core
//!
//! Turns a frame stack into a trajectory:
//! - **Centroids:** Intensity-weighted position of the molecule per frame
//! - **Kinematics:** Displacement and velocity between consecutive frames
//! - **Summary:** Per-axis velocity statistics
//!
//! This crate is pure computation: no I/O, no rendering.
//! All inputs are data; all outputs are data.

pub mod centroid;
pub mod kinematics;
pub mod pipeline;

pub use centroid::{extract_centroids, frame_centroid};
pub use kinematics::{compute_kinematics, AxisSummary, KinematicsSummary};
pub use pipeline::{analyze, Analysis};
