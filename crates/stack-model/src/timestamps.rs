//! Per-frame acquisition times.
//!
//! Timestamps come from an outside collaborator (the camera metadata, or a
//! known frame interval). The pipeline receives them as a
//! [`TimestampSequence`] argument and never looks them up itself.

use serde::{Deserialize, Serialize};

use crate::error::StackError;

/// Frame-aligned acquisition times in seconds, monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TimestampSequence(Vec<f64>);

impl TimestampSequence {
    /// Validate and wrap a list of timestamps.
    ///
    /// Equal neighbours are accepted here; a zero elapsed time is reported
    /// by the kinematics stage, which knows which step it belongs to.
    pub fn new(times: Vec<f64>) -> Result<Self, StackError> {
        if times.is_empty() {
            return Err(StackError::validation("timestamp sequence is empty"));
        }
        if let Some((index, value)) = times.iter().enumerate().find(|(_, t)| !t.is_finite()) {
            return Err(StackError::validation(format!(
                "timestamp {index} is not finite ({value})"
            )));
        }
        if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(StackError::validation(format!(
                "timestamps decrease between frame {index} ({}) and frame {} ({})",
                times[index],
                index + 1,
                times[index + 1]
            )));
        }
        Ok(Self(times))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Time between the first and last frame.
    pub fn span_secs(&self) -> f64 {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

impl TryFrom<Vec<f64>> for TimestampSequence {
    type Error = StackError;

    fn try_from(times: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(times)
    }
}

impl From<TimestampSequence> for Vec<f64> {
    fn from(seq: TimestampSequence) -> Self {
        seq.0
    }
}

/// Anything that can supply one timestamp per frame.
pub trait TimestampSource {
    /// Timestamps for the first `frame_count` frames.
    fn timestamps(&self, frame_count: usize) -> Result<TimestampSequence, StackError>;
}

/// Frames acquired at a constant interval, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedInterval {
    pub interval_secs: f64,
}

impl FixedInterval {
    pub fn new(interval_secs: f64) -> Self {
        Self { interval_secs }
    }
}

impl TimestampSource for FixedInterval {
    fn timestamps(&self, frame_count: usize) -> Result<TimestampSequence, StackError> {
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err(StackError::validation(format!(
                "frame interval must be positive, got {}",
                self.interval_secs
            )));
        }
        TimestampSequence::new(
            (0..frame_count)
                .map(|i| i as f64 * self.interval_secs)
                .collect(),
        )
    }
}
