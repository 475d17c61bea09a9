//! Intensity-weighted centroids.
//!
//! For a frame `I`, the centroid is
//! `row = Σ I(r,c)·r / Σ I(r,c)` and `col = Σ I(r,c)·c / Σ I(r,c)`.
//! Sums run in `f64` one row at a time, so each frame costs one pass.

use dnacom_common::{DnacomError, DnacomResult};
use dnacom_stack_model::{Centroid, FrameStack};
use ndarray::ArrayView2;

/// Centroid of a single frame.
///
/// `index` only labels the error for a frame whose centroid is undefined:
/// zero total intensity, or sums that overflow `f64`.
pub fn frame_centroid(frame: ArrayView2<'_, f64>, index: usize) -> DnacomResult<Centroid> {
    let mut total = 0.0_f64;
    let mut row_moment = 0.0_f64;
    let mut col_moment = 0.0_f64;

    for (r, row) in frame.outer_iter().enumerate() {
        let mut row_total = 0.0_f64;
        for (c, &value) in row.iter().enumerate() {
            row_total += value;
            col_moment += value * c as f64;
        }
        total += row_total;
        row_moment += row_total * r as f64;
    }

    if !(total.is_finite() && row_moment.is_finite() && col_moment.is_finite()) {
        return Err(DnacomError::computation(format!(
            "frame {index} total intensity overflowed; its centroid is undefined"
        )));
    }
    if total <= 0.0 {
        return Err(DnacomError::computation(format!(
            "frame {index} has zero total intensity; its centroid is undefined"
        )));
    }

    Ok(Centroid::new(row_moment / total, col_moment / total))
}

/// Centroids of every frame, in frame order.
///
/// Stops at the first degenerate frame.
pub fn extract_centroids(stack: &FrameStack) -> DnacomResult<Vec<Centroid>> {
    let centroids = stack
        .frames()
        .enumerate()
        .map(|(index, frame)| {
            let centroid = frame_centroid(frame, index)?;
            tracing::trace!(frame = index, row = centroid.row, col = centroid.col, "Centroid");
            Ok(centroid)
        })
        .collect::<DnacomResult<Vec<_>>>()?;

    tracing::debug!(frames = centroids.len(), "Extracted centroids");
    Ok(centroids)
}
