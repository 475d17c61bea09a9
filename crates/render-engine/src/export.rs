//! Writing overlay videos and histogram plots to disk.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use dnacom_common::config::{AnalysisDefaults, BinRule, VideoFormat};
use dnacom_common::error::{DnacomError, DnacomResult};
use dnacom_stack_model::{KinematicsStep, VelocityAxis};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageError, RgbImage};

use crate::annotate::{AnnotatedStack, Rgb8};
use crate::histogram::{velocity_histograms, VelocityHistograms};
use crate::plot::{render_histogram, PlotStyle};

/// Quantizer speed passed to the GIF encoder (1 is slowest, 30 fastest).
const GIF_ENCODER_SPEED: i32 = 10;

/// Brightest gray a marked GIF frame may hold. 255 gray levels plus the
/// marker fit the 256-entry palette, so the encoder never quantizes.
const GIF_MAX_MARKED_GRAY: u8 = 254;

/// How the overlay video is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoOptions {
    pub format: VideoFormat,

    /// Delay between frames, in milliseconds.
    pub frame_delay_ms: u32,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self::from(&AnalysisDefaults::default())
    }
}

impl From<&AnalysisDefaults> for VideoOptions {
    fn from(defaults: &AnalysisDefaults) -> Self {
        Self {
            format: defaults.video_format,
            frame_delay_ms: defaults.frame_delay_ms,
        }
    }
}

/// Progress callback for video export.
pub type ProgressCallback = Box<dyn Fn(ExportProgress)>;

/// Export progress report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Frames written so far.
    pub frames_written: usize,

    /// Total frames to write.
    pub total_frames: usize,

    pub stage: ExportStage,
}

/// Stages of a video export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Encoding,
    Complete,
}

/// A writer for one video container.
pub trait VideoBackend {
    /// Write every frame of `stack` to `output`.
    fn write(
        &mut self,
        stack: &AnnotatedStack,
        output: &Path,
        progress: Option<&ProgressCallback>,
    ) -> DnacomResult<()>;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Looping animated GIF.
pub struct GifBackend {
    frame_delay_ms: u32,
}

/// One PNG per frame in an output directory.
pub struct PngSequenceBackend;

impl GifBackend {
    pub fn new(frame_delay_ms: u32) -> Self {
        Self { frame_delay_ms }
    }
}

impl VideoBackend for GifBackend {
    fn write(
        &mut self,
        stack: &AnnotatedStack,
        output: &Path,
        progress: Option<&ProgressCallback>,
    ) -> DnacomResult<()> {
        let file = File::create(output)?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_ENCODER_SPEED);
        encoder.set_repeat(Repeat::Infinite).map_err(image_err)?;

        let delay = Delay::from_numer_denom_ms(self.frame_delay_ms, 1);
        let total = stack.frame_count();
        for index in 0..total {
            let mut rgb = frame_at(stack, index)?;
            if let Some(marker) = stack.highlight() {
                fold_gray_levels(&mut rgb, marker);
            }
            let rgba = DynamicImage::ImageRgb8(rgb).into_rgba8();
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .map_err(image_err)?;
            report(progress, index + 1, total, ExportStage::Encoding);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "gif"
    }
}

impl VideoBackend for PngSequenceBackend {
    fn write(
        &mut self,
        stack: &AnnotatedStack,
        output: &Path,
        progress: Option<&ProgressCallback>,
    ) -> DnacomResult<()> {
        std::fs::create_dir_all(output)?;
        let total = stack.frame_count();
        for index in 0..total {
            let path = output.join(sequence_frame_name(index));
            frame_at(stack, index)?.save(&path).map_err(image_err)?;
            report(progress, index + 1, total, ExportStage::Encoding);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "png-sequence"
    }
}

/// File name of frame `index` in a PNG sequence.
pub fn sequence_frame_name(index: usize) -> String {
    format!("frame_{index:04}.png")
}

/// Write the annotated frames as a looping video.
///
/// For [`VideoFormat::Gif`] `output` is the GIF file; for
/// [`VideoFormat::PngSequence`] it is the directory receiving the frames.
/// Missing parent directories are created. Returns the path written.
pub fn export_video(
    stack: &AnnotatedStack,
    output: &Path,
    options: &VideoOptions,
    progress: Option<ProgressCallback>,
) -> DnacomResult<PathBuf> {
    if stack.frame_count() == 0 {
        return Err(DnacomError::render("no frames to export"));
    }
    if options.frame_delay_ms == 0 {
        return Err(DnacomError::render("frame delay must be at least 1 ms"));
    }

    tracing::info!(
        output = %output.display(),
        format = ?options.format,
        frames = stack.frame_count(),
        delay_ms = options.frame_delay_ms,
        "Starting video export"
    );

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    report(progress.as_ref(), 0, stack.frame_count(), ExportStage::Preparing);

    let mut backend: Box<dyn VideoBackend> = match options.format {
        VideoFormat::Gif => Box::new(GifBackend::new(options.frame_delay_ms)),
        VideoFormat::PngSequence => Box::new(PngSequenceBackend),
    };
    tracing::debug!(backend = backend.name(), "Using video backend");
    backend.write(stack, output, progress.as_ref())?;

    report(
        progress.as_ref(),
        stack.frame_count(),
        stack.frame_count(),
        ExportStage::Complete,
    );
    tracing::info!(output = %output.display(), "Video export complete");
    Ok(output.to_path_buf())
}

/// Paths of the two histogram images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramArtifacts {
    pub x: PathBuf,
    pub y: PathBuf,
}

/// File name of the histogram plot for `axis`.
pub fn histogram_file_name(axis: VelocityAxis) -> String {
    format!("velocity_{}.png", axis.label())
}

/// Bin and plot both velocity axes, writing one PNG per axis into `out_dir`.
pub fn export_histograms(
    steps: &[KinematicsStep],
    out_dir: &Path,
    rule: BinRule,
) -> DnacomResult<HistogramArtifacts> {
    let histograms = velocity_histograms(steps, rule)?;
    write_histograms(&histograms, out_dir)
}

/// Plot already-binned histograms into `out_dir`.
pub fn write_histograms(
    histograms: &VelocityHistograms,
    out_dir: &Path,
) -> DnacomResult<HistogramArtifacts> {
    std::fs::create_dir_all(out_dir)?;

    let write_axis = |axis: VelocityAxis| -> DnacomResult<PathBuf> {
        let histogram = histograms.axis(axis);
        let path = out_dir.join(histogram_file_name(axis));
        render_histogram(histogram, &PlotStyle::for_axis(axis))
            .save(&path)
            .map_err(image_err)?;
        tracing::info!(
            axis = axis.label(),
            bins = histogram.bin_count(),
            path = %path.display(),
            "Wrote velocity histogram"
        );
        Ok(path)
    };

    Ok(HistogramArtifacts {
        x: write_axis(VelocityAxis::X)?,
        y: write_axis(VelocityAxis::Y)?,
    })
}

fn frame_at(stack: &AnnotatedStack, index: usize) -> DnacomResult<RgbImage> {
    stack
        .frame_image(index)
        .ok_or_else(|| DnacomError::render(format!("frame {index} is out of range")))
}

/// Clamp every gray pixel other than `marker` to [`GIF_MAX_MARKED_GRAY`].
fn fold_gray_levels(frame: &mut RgbImage, marker: Rgb8) {
    for pixel in frame.pixels_mut() {
        let [r, g, b] = pixel.0;
        if pixel.0 != marker && r == g && g == b && r > GIF_MAX_MARKED_GRAY {
            pixel.0 = [GIF_MAX_MARKED_GRAY; 3];
        }
    }
}

fn report(progress: Option<&ProgressCallback>, written: usize, total: usize, stage: ExportStage) {
    if let Some(cb) = progress {
        let fraction = if total == 0 {
            0.0
        } else {
            written as f64 / total as f64
        };
        cb(ExportProgress {
            progress: fraction,
            frames_written: written,
            total_frames: total,
            stage,
        });
    }
}

fn image_err(err: ImageError) -> DnacomError {
    DnacomError::render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{annotate_stack, HIGHLIGHT_RED};
    use dnacom_stack_model::{Centroid, FrameStack};
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use ndarray::Array3;
    use std::cell::RefCell;
    use std::io::BufReader;
    use std::rc::Rc;
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dnacom-export-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn annotated(frames: usize) -> AnnotatedStack {
        let data = Array3::from_shape_fn((frames, 4, 5), |(f, r, c)| (f + r + c) as f64);
        let stack = FrameStack::new(data).unwrap();
        let centroids = vec![Centroid::new(1.0, 2.0); frames];
        annotate_stack(&stack, &centroids, HIGHLIGHT_RED).unwrap()
    }

    fn steps() -> Vec<KinematicsStep> {
        (0..6)
            .map(|i| {
                let v = i as f64 - 2.5;
                KinematicsStep {
                    dx: v,
                    dy: -v,
                    dt: 1.0,
                    vx: v,
                    vy: -v,
                }
            })
            .collect()
    }

    #[test]
    fn test_gif_has_every_frame() {
        let dir = scratch_dir("gif");
        let output = dir.join("nested").join("overlay.gif");
        let written = export_video(&annotated(3), &output, &VideoOptions::default(), None).unwrap();
        assert_eq!(written, output);

        let decoder = GifDecoder::new(BufReader::new(File::open(&output).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].buffer().dimensions(), (5, 4));
        assert_eq!(Duration::from(frames[0].delay()), Duration::from_millis(50));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_gif_keeps_marker_with_full_gray_range() {
        // 64x64 frames cover all 256 gray levels before the marker is added.
        let data = Array3::from_shape_fn((2, 64, 64), |(_, r, c)| ((r * 64 + c) % 256) as f64);
        let stack = FrameStack::new(data).unwrap();
        let centroids = vec![Centroid::new(10.0, 20.0); 2];
        let overlay = annotate_stack(&stack, &centroids, HIGHLIGHT_RED).unwrap();

        let dir = scratch_dir("gif-marker");
        let output = dir.join("overlay.gif");
        export_video(&overlay, &output, &VideoOptions::default(), None).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&output).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            let buffer = frame.buffer();
            assert_eq!(buffer.get_pixel(20, 10).0, [255, 0, 0, 255]);
            // (row 0, col 7) holds gray 7; (row 3, col 63) holds 255, folded to 254.
            assert_eq!(buffer.get_pixel(7, 0).0, [7, 7, 7, 255]);
            assert_eq!(buffer.get_pixel(63, 3).0, [254, 254, 254, 255]);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_fold_gray_levels_spares_marker_and_color() {
        let mut frame = RgbImage::from_raw(
            4,
            1,
            vec![255, 255, 255, 254, 254, 254, 255, 0, 0, 255, 200, 255],
        )
        .unwrap();
        fold_gray_levels(&mut frame, HIGHLIGHT_RED);
        assert_eq!(frame.get_pixel(0, 0).0, [254, 254, 254]);
        assert_eq!(frame.get_pixel(1, 0).0, [254, 254, 254]);
        assert_eq!(frame.get_pixel(2, 0).0, HIGHLIGHT_RED);
        assert_eq!(frame.get_pixel(3, 0).0, [255, 200, 255]);

        // A white marker keeps its level; other whites fold below it.
        let mut white = RgbImage::from_raw(1, 1, vec![255, 255, 255]).unwrap();
        fold_gray_levels(&mut white, [255, 255, 255]);
        assert_eq!(white.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_png_sequence() {
        let dir = scratch_dir("png");
        let options = VideoOptions {
            format: VideoFormat::PngSequence,
            frame_delay_ms: 50,
        };
        export_video(&annotated(2), &dir, &options, None).unwrap();

        let first = image::open(dir.join(sequence_frame_name(0))).unwrap().into_rgb8();
        assert_eq!(first.get_pixel(2, 1).0, HIGHLIGHT_RED);
        assert!(dir.join("frame_0001.png").exists());
        assert!(!dir.join("frame_0002.png").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_progress_reaches_complete() {
        let dir = scratch_dir("progress");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |p| sink.borrow_mut().push(p));

        export_video(
            &annotated(2),
            &dir.join("overlay.gif"),
            &VideoOptions::default(),
            Some(callback),
        )
        .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.first().unwrap().stage, ExportStage::Preparing);
        let last = seen.last().unwrap();
        assert_eq!(last.stage, ExportStage::Complete);
        assert_eq!(last.progress, 1.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_zero_delay() {
        let options = VideoOptions {
            format: VideoFormat::Gif,
            frame_delay_ms: 0,
        };
        let err = export_video(&annotated(1), Path::new("unused.gif"), &options, None).unwrap_err();
        assert!(matches!(err, DnacomError::Render { .. }));
    }

    #[test]
    fn test_export_histograms_writes_both_axes() {
        let dir = scratch_dir("hist");
        let artifacts = export_histograms(&steps(), &dir, BinRule::Fixed { bins: 3 }).unwrap();
        assert_eq!(artifacts.x, dir.join("velocity_x.png"));
        assert_eq!(artifacts.y, dir.join("velocity_y.png"));

        let plot = image::open(&artifacts.x).unwrap();
        assert_eq!((plot.width(), plot.height()), (640, 480));
        assert!(artifacts.y.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
