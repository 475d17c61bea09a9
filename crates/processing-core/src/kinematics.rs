//! Finite-difference kinematics between consecutive centroids.
//!
//! `dx` and `vx` follow columns, `dy` and `vy` follow rows. Each step uses
//! only its two frames, so a sequence of `n` centroids yields `n - 1` steps.

use dnacom_common::{DnacomError, DnacomResult};
use dnacom_stack_model::{Centroid, KinematicsStep, TimestampSequence, VelocityAxis};
use serde::{Deserialize, Serialize};

/// Displacement and velocity for every consecutive pair of frames.
///
/// `centroids` and `timestamps` must be frame-aligned. A non-positive
/// elapsed time between two frames is an error naming the step.
pub fn compute_kinematics(
    centroids: &[Centroid],
    timestamps: &TimestampSequence,
) -> DnacomResult<Vec<KinematicsStep>> {
    if centroids.len() != timestamps.len() {
        return Err(DnacomError::kinematics(format!(
            "{} centroids but {} timestamps",
            centroids.len(),
            timestamps.len()
        )));
    }

    let steps = centroids
        .windows(2)
        .zip(timestamps.as_slice().windows(2))
        .enumerate()
        .map(|(i, (c, t))| {
            let dt = t[1] - t[0];
            if dt <= 0.0 || !dt.is_finite() {
                return Err(DnacomError::kinematics(format!(
                    "elapsed time between frame {i} and frame {} is {dt}s; it must be positive",
                    i + 1
                )));
            }
            let dx = c[1].col - c[0].col;
            let dy = c[1].row - c[0].row;
            Ok(KinematicsStep {
                dx,
                dy,
                dt,
                vx: dx / dt,
                vy: dy / dt,
            })
        })
        .collect::<DnacomResult<Vec<_>>>()?;

    tracing::debug!(steps = steps.len(), "Computed kinematics");
    Ok(steps)
}

/// Descriptive statistics of one velocity axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSummary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl AxisSummary {
    /// Summarize a set of values. `None` when `values` is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Velocity statistics for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsSummary {
    pub x: AxisSummary,
    pub y: AxisSummary,
    /// Mean speed (magnitude of the velocity vector).
    pub mean_speed: f64,
    /// Total path length in pixels.
    pub path_length: f64,
}

impl KinematicsSummary {
    /// `None` when there are no steps.
    pub fn from_steps(steps: &[KinematicsStep]) -> Option<Self> {
        let x = AxisSummary::from_values(&dnacom_stack_model::velocities(steps, VelocityAxis::X))?;
        let y = AxisSummary::from_values(&dnacom_stack_model::velocities(steps, VelocityAxis::Y))?;
        let mean_speed = steps.iter().map(KinematicsStep::speed).sum::<f64>() / steps.len() as f64;
        let path_length = steps.iter().map(KinematicsStep::distance).sum();
        Some(Self {
            x,
            y,
            mean_speed,
            path_length,
        })
    }

    pub fn axis(&self, axis: VelocityAxis) -> &AxisSummary {
        match axis {
            VelocityAxis::X => &self.x,
            VelocityAxis::Y => &self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(times: &[f64]) -> TimestampSequence {
        TimestampSequence::new(times.to_vec()).unwrap()
    }

    #[test]
    fn test_axes_follow_columns_and_rows() {
        let centroids = [Centroid::new(1.0, 2.0), Centroid::new(4.0, 3.0)];
        let steps = compute_kinematics(&centroids, &seq(&[0.0, 0.5])).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].dx, 1.0);
        assert_eq!(steps[0].dy, 3.0);
        assert_eq!(steps[0].vx, 2.0);
        assert_eq!(steps[0].vy, 6.0);
        assert_eq!(steps[0].dt, 0.5);
    }

    #[test]
    fn test_single_frame_yields_no_steps() {
        let steps = compute_kinematics(&[Centroid::new(0.0, 0.0)], &seq(&[0.0])).unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn test_repeated_timestamp_is_an_error() {
        let centroids = [Centroid::new(0.0, 0.0); 3];
        let err = compute_kinematics(&centroids, &seq(&[0.0, 1.0, 1.0])).unwrap_err();
        assert!(matches!(err, DnacomError::Kinematics { .. }));
        assert!(err.to_string().contains("frame 1 and frame 2"));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let centroids = [Centroid::new(0.0, 0.0); 3];
        let err = compute_kinematics(&centroids, &seq(&[0.0, 1.0])).unwrap_err();
        assert!(matches!(err, DnacomError::Kinematics { .. }));
    }

    #[test]
    fn test_summary() {
        let steps = vec![
            KinematicsStep {
                dx: 3.0,
                dy: 4.0,
                dt: 1.0,
                vx: 3.0,
                vy: 4.0,
            },
            KinematicsStep {
                dx: -3.0,
                dy: -4.0,
                dt: 1.0,
                vx: -3.0,
                vy: -4.0,
            },
        ];
        let summary = KinematicsSummary::from_steps(&steps).unwrap();
        assert_eq!(summary.x.count, 2);
        assert_eq!(summary.x.mean, 0.0);
        assert_eq!(summary.x.std_dev, 3.0);
        assert_eq!(summary.y.min, -4.0);
        assert_eq!(summary.y.max, 4.0);
        assert_eq!(summary.mean_speed, 5.0);
        assert_eq!(summary.path_length, 10.0);
        assert!(KinematicsSummary::from_steps(&[]).is_none());
    }
}
