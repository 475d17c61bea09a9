//! Equal-width histograms over an observed range.

use dnacom_common::{BinRule, DnacomError, DnacomResult};
use dnacom_stack_model::{velocities, KinematicsStep, VelocityAxis};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of bins a data-driven rule may choose.
pub const MAX_AUTO_BINS: usize = 1_000;

/// Counts of values falling into consecutive equal-width bins.
///
/// Bin `i` covers `[edges[i], edges[i + 1])`; the last bin also includes
/// its right edge, so every input value lands in exactly one bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` over `[min, max]` using `rule`.
    ///
    /// A zero-width range is widened to `[v - 0.5, v + 0.5]`.
    pub fn from_values(values: &[f64], rule: BinRule) -> DnacomResult<Self> {
        if values.is_empty() {
            return Err(DnacomError::render("cannot build a histogram from no values"));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(DnacomError::render(format!(
                "cannot build a histogram containing {bad}"
            )));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (min, max) = (sorted[0], sorted[sorted.len() - 1]);

        let bins = bin_count(&sorted, rule)?;
        let (lo, hi) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; bins];
        for &v in &sorted {
            let idx = (((v - lo) / (hi - lo)) * bins as f64).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of values binned.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Largest single bin count.
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left edge, right edge)` of the whole histogram.
    pub fn range(&self) -> (f64, f64) {
        (
            self.edges.first().copied().unwrap_or(0.0),
            self.edges.last().copied().unwrap_or(0.0),
        )
    }

    /// Width of each bin.
    pub fn bin_width(&self) -> f64 {
        let (lo, hi) = self.range();
        if self.counts.is_empty() {
            return 0.0;
        }
        (hi - lo) / self.counts.len() as f64
    }
}

/// The x and y velocity histograms of one trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityHistograms {
    pub x: Histogram,
    pub y: Histogram,
}

impl VelocityHistograms {
    pub fn axis(&self, axis: VelocityAxis) -> &Histogram {
        match axis {
            VelocityAxis::X => &self.x,
            VelocityAxis::Y => &self.y,
        }
    }
}

/// Bin each velocity axis independently.
pub fn velocity_histograms(
    steps: &[KinematicsStep],
    rule: BinRule,
) -> DnacomResult<VelocityHistograms> {
    if steps.is_empty() {
        return Err(DnacomError::render(
            "no kinematics to plot; the stack needs at least two frames",
        ));
    }
    Ok(VelocityHistograms {
        x: Histogram::from_values(&velocities(steps, VelocityAxis::X), rule)?,
        y: Histogram::from_values(&velocities(steps, VelocityAxis::Y), rule)?,
    })
}

/// Number of bins `rule` picks for sorted, finite, non-empty `sorted`.
fn bin_count(sorted: &[f64], rule: BinRule) -> DnacomResult<usize> {
    let n = sorted.len();
    let range = sorted[n - 1] - sorted[0];

    match rule {
        BinRule::Fixed { bins: 0 } => Err(DnacomError::render("bin count must be at least 1")),
        BinRule::Fixed { bins } => Ok(bins),
        BinRule::Sturges => Ok(sturges_bins(n)),
        BinRule::Auto => {
            if range <= 0.0 {
                return Ok(1);
            }
            let sturges_width = range / ((n as f64).log2() + 1.0);
            let iqr = percentile(sorted, 0.75) - percentile(sorted, 0.25);
            let fd_width = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);

            let width = if fd_width > 0.0 {
                fd_width.min(sturges_width)
            } else {
                sturges_width
            };
            let bins = (range / width).ceil() as usize;
            Ok(bins.clamp(1, MAX_AUTO_BINS))
        }
    }
}

fn sturges_bins(n: usize) -> usize {
    ((n as f64).log2() + 1.0).ceil().max(1.0) as usize
}

/// Linearly interpolated percentile of sorted data, `p` in `[0, 1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
