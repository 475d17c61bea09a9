//! The frame stack: every intensity sample of one acquisition.
//!
//! Axis order is `(frame, row, col)`. Samples are non-negative and finite;
//! the stack is validated once at construction and never mutated after.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::StackError;

/// A validated, read-only stack of grayscale frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStack {
    data: Array3<f64>,
}

impl FrameStack {
    /// Wrap a `(frames, height, width)` array.
    ///
    /// Fails if any dimension is zero or any sample is negative or not finite.
    pub fn new(data: Array3<f64>) -> Result<Self, StackError> {
        let (frames, height, width) = data.dim();
        if frames == 0 {
            return Err(StackError::validation("stack contains no frames"));
        }
        if height == 0 || width == 0 {
            return Err(StackError::validation(format!(
                "frames must be at least 1x1, got {height}x{width}"
            )));
        }

        for (index, frame) in data.outer_iter().enumerate() {
            if let Some(bad) = frame.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(StackError::validation(format!(
                    "frame {index} contains invalid intensity {bad} (samples must be finite and non-negative)"
                )));
            }
        }

        Ok(Self { data })
    }

    /// Build a stack from individual frames, which must all share one shape.
    pub fn from_frames(frames: Vec<Array2<f64>>) -> Result<Self, StackError> {
        let Some(first) = frames.first() else {
            return Err(StackError::validation("stack contains no frames"));
        };
        let (height, width) = first.dim();

        for (index, frame) in frames.iter().enumerate() {
            if frame.dim() != (height, width) {
                let (h, w) = frame.dim();
                return Err(StackError::validation(format!(
                    "frame {index} is {h}x{w}, expected {height}x{width}"
                )));
            }
        }

        let count = frames.len();
        let mut samples = Vec::with_capacity(count * height * width);
        for frame in &frames {
            samples.extend(frame.iter().copied());
        }

        let data = Array3::from_shape_vec((count, height, width), samples)
            .map_err(|e| StackError::validation(format!("cannot assemble stack: {e}")))?;
        Self::new(data)
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Frame height in pixels (rows).
    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Frame width in pixels (columns).
    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// `(frames, height, width)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// A view of one frame, or `None` if `index` is out of range.
    pub fn frame(&self, index: usize) -> Option<ArrayView2<'_, f64>> {
        if index >= self.frame_count() {
            return None;
        }
        Some(self.data.index_axis(Axis(0), index))
    }

    /// Iterate frames in acquisition order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = ArrayView2<'_, f64>> {
        self.data.outer_iter()
    }

    /// Largest sample in the whole stack.
    pub fn max_intensity(&self) -> f64 {
        self.data.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Smallest sample in the whole stack.
    pub fn min_intensity(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// The underlying samples.
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }
}
