//! Per-step motion between consecutive frames.

use serde::{Deserialize, Serialize};

/// Displacement and velocity between frame `i` and frame `i + 1`.
///
/// `x` follows columns (surface-roughness driven motion across the
/// channel) and `y` follows rows (flow-driven motion along it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsStep {
    /// Column displacement in pixels.
    pub dx: f64,
    /// Row displacement in pixels.
    pub dy: f64,
    /// Elapsed time in seconds. Always positive.
    pub dt: f64,
    /// Column velocity in pixels per second.
    pub vx: f64,
    /// Row velocity in pixels per second.
    pub vy: f64,
}

/// One velocity axis of a kinematics sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityAxis {
    X,
    Y,
}

impl VelocityAxis {
    pub const BOTH: [VelocityAxis; 2] = [VelocityAxis::X, VelocityAxis::Y];

    pub fn label(self) -> &'static str {
        match self {
            VelocityAxis::X => "x",
            VelocityAxis::Y => "y",
        }
    }
}

impl KinematicsStep {
    /// Velocity along one axis.
    pub fn velocity(&self, axis: VelocityAxis) -> f64 {
        match axis {
            VelocityAxis::X => self.vx,
            VelocityAxis::Y => self.vy,
        }
    }

    /// Displacement along one axis.
    pub fn displacement(&self, axis: VelocityAxis) -> f64 {
        match axis {
            VelocityAxis::X => self.dx,
            VelocityAxis::Y => self.dy,
        }
    }

    /// Step length in pixels.
    pub fn distance(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Speed in pixels per second.
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Collect one velocity axis from a sequence of steps.
pub fn velocities(steps: &[KinematicsStep], axis: VelocityAxis) -> Vec<f64> {
    steps.iter().map(|s| s.velocity(axis)).collect()
}
