//! dnacom Stack Model
//!
//! Defines the data contracts of the analysis pipeline:
//! - **Frame Stack:** Immutable `(frames, height, width)` intensity samples
//! - **Centroid:** Sub-pixel `(row, col)` position of the molecule per frame
//! - **Timestamps:** Per-frame acquisition times and the sources that supply them
//! - **Kinematics:** Displacement and velocity between consecutive frames
//!
//! The loader and metadata parser live here too, because they are the only
//! code that turns files into these types.

pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod loader;
pub mod metadata;
pub mod stack;
pub mod timestamps;

pub use error::*;
pub use geometry::*;
pub use kinematics::*;
pub use loader::*;
pub use metadata::*;
pub use stack::*;
pub use timestamps::*;
