//! Sub-pixel positions within a frame.

use serde::{Deserialize, Serialize};

/// Intensity-weighted position of the molecule in one frame.
///
/// `row` grows downward and `col` grows to the right; `(0.0, 0.0)` is the
/// center of the top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub row: f64,
    pub col: f64,
}

impl Centroid {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Center of a `height` x `width` frame.
    pub fn geometric_center(height: usize, width: usize) -> Self {
        Self {
            row: height.saturating_sub(1) as f64 / 2.0,
            col: width.saturating_sub(1) as f64 / 2.0,
        }
    }

    /// Whether the position lies inside `[0, height-1] x [0, width-1]`.
    pub fn is_within(&self, height: usize, width: usize) -> bool {
        let max_row = height.saturating_sub(1) as f64;
        let max_col = width.saturating_sub(1) as f64;
        (0.0..=max_row).contains(&self.row) && (0.0..=max_col).contains(&self.col)
    }

    /// The pixel `(row, col)` this position falls on.
    ///
    /// Rounds half away from zero, then clamps into the frame. Frames have
    /// at least one pixel, so the result is always a valid index.
    pub fn nearest_pixel(&self, height: usize, width: usize) -> (usize, usize) {
        (
            round_to_index(self.row, height),
            round_to_index(self.col, width),
        )
    }

    /// Euclidean distance to another position, in pixels.
    pub fn distance(&self, other: &Centroid) -> f64 {
        (self.row - other.row).hypot(self.col - other.col)
    }
}

fn round_to_index(value: f64, len: usize) -> usize {
    let max = len.saturating_sub(1);
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value.round() as usize).min(max)
}
