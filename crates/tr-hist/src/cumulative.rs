//! Cumulative "rate at or above threshold" curves.

use serde::{Deserialize, Serialize};
use tr_core::{Error, REFERENCE_COLLISION_RATE, Result};

use crate::filler::PileupHistogram;

/// Right-to-left running sum: `curve[i] = counts[i] + curve[i + 1]`.
///
/// Summed in integers; the only rounding is the final conversion to `f64`.
pub fn cumulative(counts: &[u64]) -> Vec<f64> {
    let mut curve = vec![0.0; counts.len()];
    let mut running: u64 = 0;
    for (i, &c) in counts.iter().enumerate().rev() {
        running += c;
        curve[i] = running as f64;
    }
    curve
}

/// Scale a non-increasing `curve` so that `curve[0] == REFERENCE_COLLISION_RATE`.
///
/// Empty curves and curves with `curve[0] == 0` are returned unchanged.
pub fn normalize_to_collision_rate(mut curve: Vec<f64>) -> Vec<f64> {
    let Some(&first) = curve.first() else {
        return curve;
    };
    if first == 0.0 {
        return curve;
    }
    let scale = REFERENCE_COLLISION_RATE / first;
    for v in curve.iter_mut() {
        // `first * scale` can round one ulp past the reference.
        *v = (*v * scale).min(REFERENCE_COLLISION_RATE);
    }
    curve[0] = REFERENCE_COLLISION_RATE;
    curve
}

/// A rate curve together with the value-axis edges its bins refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCurve {
    edges: Vec<f64>,
    values: Vec<f64>,
}

impl RateCurve {
    /// Cumulative curve of the aggregate row of `hist`.
    pub fn from_histogram(hist: &PileupHistogram) -> Self {
        Self {
            edges: hist.value_axis().edges().to_vec(),
            values: cumulative(hist.everything()),
        }
    }

    /// Cumulative curve of raw counts over `edges` (length = counts + 1).
    pub fn from_counts(edges: Vec<f64>, counts: &[u64]) -> Result<Self> {
        if edges.len() != counts.len() + 1 {
            return Err(Error::Validation(format!(
                "{} counts need {} edges, got {}",
                counts.len(),
                counts.len() + 1,
                edges.len()
            )));
        }
        Ok(Self { edges, values: cumulative(counts) })
    }

    /// Normalized copy (see [`normalize_to_collision_rate`]).
    pub fn normalized(self) -> Self {
        Self { edges: self.edges, values: normalize_to_collision_rate(self.values) }
    }

    /// Curve values, one per bin.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.values.len()
    }

    /// Rate at threshold bin `bin`.
    pub fn rate_at(&self, bin: usize) -> Option<f64> {
        self.values.get(bin).copied()
    }

    /// Physical threshold (lower bin edge) of `bin`.
    pub fn threshold_value(&self, bin: usize) -> Option<f64> {
        if bin < self.values.len() { self.edges.get(bin).copied() } else { None }
    }
}
