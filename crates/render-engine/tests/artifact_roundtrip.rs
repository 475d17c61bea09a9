use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use dnacom_common::BinRule;
use dnacom_render_engine::{
    annotate_stack, export_histograms, export_video, PlotStyle, VideoOptions, HIGHLIGHT_RED,
};
use dnacom_stack_model::{Centroid, FrameStack, KinematicsStep, VelocityAxis};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use ndarray::Array3;
use proptest::prelude::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dnacom-artifacts-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Frames whose samples span every gray level, so the marker is color 257.
fn full_range_stack(frames: usize) -> FrameStack {
    let data = Array3::from_shape_fn((frames, 64, 64), |(f, r, c)| ((r * 64 + c + f) % 256) as f64);
    FrameStack::new(data).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn gif_marker_survives_encoding(
        track in prop::collection::vec((0.0f64..63.0, 0.0f64..63.0), 1..4)
    ) {
        let stack = full_range_stack(track.len());
        let centroids: Vec<Centroid> =
            track.iter().map(|&(r, c)| Centroid::new(r, c)).collect();
        let overlay = annotate_stack(&stack, &centroids, HIGHLIGHT_RED).unwrap();

        let dir = scratch_dir("gif");
        let output = dir.join("overlay.gif");
        export_video(&overlay, &output, &VideoOptions::default(), None).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&output).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        prop_assert_eq!(frames.len(), centroids.len());
        for (frame, centroid) in frames.iter().zip(&centroids) {
            let (row, col) = centroid.nearest_pixel(64, 64);
            prop_assert_eq!(
                frame.buffer().get_pixel(col as u32, row as u32).0,
                [255, 0, 0, 255]
            );
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

#[test]
fn many_bin_histograms_are_not_blank() {
    let steps: Vec<KinematicsStep> = (0..2000)
        .map(|i| {
            let v = f64::from(i);
            KinematicsStep {
                dx: v,
                dy: v,
                dt: 1.0,
                vx: v,
                vy: v,
            }
        })
        .collect();

    let dir = scratch_dir("hist");
    let artifacts = export_histograms(&steps, &dir, BinRule::Fixed { bins: 1000 }).unwrap();

    for (axis, path) in [(VelocityAxis::X, &artifacts.x), (VelocityAxis::Y, &artifacts.y)] {
        let style = PlotStyle::for_axis(axis);
        let plot = image::open(path).unwrap().into_rgb8();
        let bars = plot.pixels().filter(|p| p.0 == style.bar_color).count();
        assert!(bars > 10_000, "{} histogram has {bars} bar pixels", axis.label());
    }

    std::fs::remove_dir_all(&dir).unwrap();
}
