//! dnacom Render Engine
//!
//! Turns an analyzed frame stack into the two visual outputs of a run:
//! a looping overlay video with the centroid marked on every frame, and
//! one velocity histogram per axis.
//!
//! # Pipeline Architecture
//!
//! ```text
//! FrameStack ──┐
//!              ├── Grayscale (stack-wide intensity scale)
//! centroids ───┘         │
//!                        ├── Centroid Marker
//!                        ▼
//!                  AnnotatedStack ── Encode (GIF / PNG sequence)
//!                                              │
//!                                              ▼
//!                                         overlay.gif
//!
//! kinematics ── Bin (vx, vy) ── Bar Chart ── velocity_x.png
//!                                       └─── velocity_y.png
//! ```

pub mod annotate;
pub mod export;
pub mod histogram;
pub mod plot;

pub use annotate::*;
pub use export::*;
pub use histogram::*;
pub use plot::*;
