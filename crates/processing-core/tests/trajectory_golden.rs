use dnacom_common::DnacomError;
use dnacom_processing_core::{analyze, compute_kinematics, extract_centroids};
use dnacom_stack_model::{Centroid, FrameStack, TimestampSequence};
use ndarray::Array3;

/// Three 4x4 frames: a single lit pixel at (0,0), then (3,3), then (0,0).
fn corner_hopping_stack() -> FrameStack {
    let mut data = Array3::<f64>::zeros((3, 4, 4));
    data[[0, 0, 0]] = 1.0;
    data[[1, 3, 3]] = 1.0;
    data[[2, 0, 0]] = 1.0;
    FrameStack::new(data).expect("fixture stack is valid")
}

#[test]
fn corner_hop_centroids_and_kinematics() {
    let stack = corner_hopping_stack();
    let timestamps = TimestampSequence::new(vec![0.0, 1.0, 2.0]).unwrap();

    let centroids = extract_centroids(&stack).unwrap();
    assert_eq!(
        centroids,
        vec![
            Centroid::new(0.0, 0.0),
            Centroid::new(3.0, 3.0),
            Centroid::new(0.0, 0.0),
        ]
    );

    let steps = compute_kinematics(&centroids, &timestamps).unwrap();
    assert_eq!(steps.len(), 2);

    let summary: Vec<(f64, f64, f64, f64)> =
        steps.iter().map(|s| (s.dx, s.dy, s.vx, s.vy)).collect();
    assert_eq!(
        summary,
        vec![(3.0, 3.0, 3.0, 3.0), (-3.0, -3.0, -3.0, -3.0)]
    );
}

#[test]
fn analyze_runs_both_stages() {
    let stack = corner_hopping_stack();
    let timestamps = TimestampSequence::new(vec![0.0, 0.5, 1.0]).unwrap();

    let analysis = analyze(&stack, &timestamps).unwrap();
    assert_eq!(analysis.centroids.len(), 3);
    assert_eq!(analysis.kinematics.len(), 2);
    assert_eq!(analysis.kinematics[0].vx, 6.0);

    let summary = analysis.summary.expect("two steps have a summary");
    assert_eq!(summary.x.mean, 0.0);
    assert_eq!(summary.y.max, 6.0);
}

#[test]
fn dark_frame_aborts_the_pipeline() {
    let mut data = Array3::<f64>::zeros((3, 4, 4));
    data[[0, 1, 1]] = 5.0;
    data[[2, 2, 2]] = 5.0;
    let stack = FrameStack::new(data).unwrap();
    let timestamps = TimestampSequence::new(vec![0.0, 1.0, 2.0]).unwrap();

    let err = analyze(&stack, &timestamps).unwrap_err();
    assert!(matches!(err, DnacomError::Computation { .. }), "{err}");
}

#[test]
fn stalled_clock_aborts_the_pipeline() {
    let stack = corner_hopping_stack();
    let timestamps = TimestampSequence::new(vec![0.0, 0.0, 1.0]).unwrap();

    let err = analyze(&stack, &timestamps).unwrap_err();
    assert!(matches!(err, DnacomError::Kinematics { .. }), "{err}");
}
