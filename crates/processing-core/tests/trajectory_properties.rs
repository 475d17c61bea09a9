use dnacom_processing_core::{compute_kinematics, extract_centroids, frame_centroid};
use dnacom_stack_model::{Centroid, FrameStack, TimestampSequence};
use ndarray::{Array2, Array3};
use proptest::prelude::*;

fn frame_strategy() -> impl Strategy<Value = Array2<f64>> {
    (1usize..12, 1usize..12).prop_flat_map(|(h, w)| {
        prop::collection::vec(0.0f64..1000.0, h * w).prop_map(move |samples| {
            let mut frame = Array2::from_shape_vec((h, w), samples).unwrap();
            // Guarantee a non-zero total so the centroid is defined.
            frame[[0, 0]] += 1.0;
            frame
        })
    })
}

fn centroid_track() -> impl Strategy<Value = Vec<Centroid>> {
    prop::collection::vec((0.0f64..512.0, 0.0f64..512.0), 1..40)
        .prop_map(|pts| pts.into_iter().map(|(r, c)| Centroid::new(r, c)).collect())
}

proptest! {
    #[test]
    fn uniform_frame_centroid_is_geometric_center(
        h in 1usize..40,
        w in 1usize..40,
        level in 0.001f64..65535.0,
    ) {
        let frame = Array2::from_elem((h, w), level);
        let c = frame_centroid(frame.view(), 0).unwrap();
        let center = Centroid::geometric_center(h, w);
        prop_assert!((c.row - center.row).abs() < 1e-9);
        prop_assert!((c.col - center.col).abs() < 1e-9);
    }

    #[test]
    fn centroid_lies_within_the_frame(frame in frame_strategy()) {
        let (h, w) = frame.dim();
        let c = frame_centroid(frame.view(), 0).unwrap();
        let eps = 1e-9;
        prop_assert!(c.row >= -eps && c.row <= (h - 1) as f64 + eps);
        prop_assert!(c.col >= -eps && c.col <= (w - 1) as f64 + eps);
    }

    #[test]
    fn stack_centroids_keep_frame_order(n in 1usize..8, h in 2usize..8, w in 2usize..8) {
        let mut data = Array3::<f64>::zeros((n, h, w));
        for i in 0..n {
            data[[i, i % h, (i * 3) % w]] = 1.0;
        }
        let stack = FrameStack::new(data).unwrap();
        let centroids = extract_centroids(&stack).unwrap();
        prop_assert_eq!(centroids.len(), n);
        for (i, c) in centroids.iter().enumerate() {
            prop_assert_eq!(*c, Centroid::new((i % h) as f64, ((i * 3) % w) as f64));
        }
    }

    #[test]
    fn kinematics_has_one_step_fewer_than_frames(
        track in centroid_track(),
        interval in 0.001f64..10.0,
    ) {
        let times = (0..track.len()).map(|i| i as f64 * interval).collect();
        let timestamps = TimestampSequence::new(times).unwrap();
        let steps = compute_kinematics(&track, &timestamps).unwrap();
        prop_assert_eq!(steps.len(), track.len() - 1);
    }

    #[test]
    fn velocity_times_elapsed_time_is_displacement(
        track in centroid_track(),
        gaps in prop::collection::vec(0.001f64..5.0, 40),
    ) {
        let mut t = 0.0;
        let mut times = Vec::with_capacity(track.len());
        for gap in gaps.iter().take(track.len()) {
            times.push(t);
            t += gap;
        }
        let timestamps = TimestampSequence::new(times).unwrap();
        let steps = compute_kinematics(&track, &timestamps).unwrap();

        for (i, step) in steps.iter().enumerate() {
            let dt = timestamps.get(i + 1).unwrap() - timestamps.get(i).unwrap();
            prop_assert!(step.dt > 0.0);
            prop_assert!((step.dt - dt).abs() < 1e-12);
            prop_assert!((step.vx * step.dt - step.dx).abs() < 1e-6);
            prop_assert!((step.vy * step.dt - step.dy).abs() < 1e-6);
            prop_assert!((step.dx - (track[i + 1].col - track[i].col)).abs() < 1e-12);
            prop_assert!((step.dy - (track[i + 1].row - track[i].row)).abs() < 1e-12);
        }
    }
}
