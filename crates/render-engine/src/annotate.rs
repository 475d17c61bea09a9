//! Frame annotation: grayscale-to-RGB conversion and the centroid marker.
//!
//! Annotation always allocates a new `(frames, height, width, 3)` array.
//! The source [`FrameStack`] is borrowed immutably and never changes.

use dnacom_common::{DnacomError, DnacomResult};
use dnacom_stack_model::{Centroid, FrameStack};
use image::{Rgb, RgbImage};
use ndarray::{s, Array4, Axis};

/// An 8-bit RGB color.
pub type Rgb8 = [u8; 3];

/// Full-intensity red, the default centroid marker.
pub const HIGHLIGHT_RED: Rgb8 = [255, 0, 0];

/// Linear map from sample intensity to an 8-bit gray level.
///
/// One scale covers the whole stack, so a frame's brightness stays
/// comparable to its neighbours during playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityScale {
    max: f64,
}

impl IntensityScale {
    /// Map `[0, max]` onto `[0, 255]`.
    pub fn new(max: f64) -> Self {
        Self { max }
    }

    /// Scale to the brightest sample in the stack.
    pub fn from_stack(stack: &FrameStack) -> Self {
        Self::new(stack.max_intensity())
    }

    /// Gray level for one sample. A zero or invalid scale maps to black.
    pub fn level(&self, value: f64) -> u8 {
        if self.max <= 0.0 || !self.max.is_finite() || !value.is_finite() {
            return 0;
        }
        (value / self.max * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// RGB frames derived from a [`FrameStack`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedStack {
    data: Array4<u8>,
    highlight: Option<Rgb8>,
}

impl AnnotatedStack {
    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// RGB value of one pixel, or `None` if out of range.
    pub fn pixel(&self, frame: usize, row: usize, col: usize) -> Option<Rgb8> {
        if frame >= self.frame_count() || row >= self.height() || col >= self.width() {
            return None;
        }
        Some([
            self.data[[frame, row, col, 0]],
            self.data[[frame, row, col, 1]],
            self.data[[frame, row, col, 2]],
        ])
    }

    /// Marker color, if the frames carry a centroid marker.
    pub fn highlight(&self) -> Option<Rgb8> {
        self.highlight
    }

    /// The underlying `(frames, height, width, 3)` array.
    pub fn data(&self) -> &Array4<u8> {
        &self.data
    }

    /// One frame as an image buffer, or `None` if out of range.
    pub fn frame_image(&self, index: usize) -> Option<RgbImage> {
        if index >= self.frame_count() {
            return None;
        }
        let frame = self.data.slice(s![index, .., .., ..]);
        Some(RgbImage::from_fn(
            self.width() as u32,
            self.height() as u32,
            |x, y| {
                let (row, col) = (y as usize, x as usize);
                Rgb([
                    frame[[row, col, 0]],
                    frame[[row, col, 1]],
                    frame[[row, col, 2]],
                ])
            },
        ))
    }
}

/// Replicate each frame's gray level into all three channels.
pub fn grayscale_stack(stack: &FrameStack, scale: IntensityScale) -> AnnotatedStack {
    let (frames, height, width) = stack.dim();
    let source = stack.data();
    let data = Array4::from_shape_fn((frames, height, width, 3), |(f, r, c, _)| {
        scale.level(source[[f, r, c]])
    });
    AnnotatedStack {
        data,
        highlight: None,
    }
}

/// Grayscale frames with the pixel nearest each centroid set to `highlight`.
///
/// Centroids are mapped to pixels with [`Centroid::nearest_pixel`]: round
/// half away from zero, then clamp into the frame.
pub fn annotate_stack(
    stack: &FrameStack,
    centroids: &[Centroid],
    highlight: Rgb8,
) -> DnacomResult<AnnotatedStack> {
    if centroids.len() != stack.frame_count() {
        return Err(DnacomError::render(format!(
            "{} centroids for {} frames",
            centroids.len(),
            stack.frame_count()
        )));
    }

    let mut annotated = grayscale_stack(stack, IntensityScale::from_stack(stack));
    annotated.highlight = Some(highlight);
    let (height, width) = (stack.height(), stack.width());

    for (frame, centroid) in centroids.iter().enumerate() {
        let (row, col) = centroid.nearest_pixel(height, width);
        for (channel, value) in highlight.iter().enumerate() {
            annotated.data[[frame, row, col, channel]] = *value;
        }
    }

    tracing::debug!(frames = annotated.frame_count(), "Annotated centroid overlay");
    Ok(annotated)
}
