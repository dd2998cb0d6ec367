//! Per-event filling of pileup-stratified count histograms.

use serde::{Deserialize, Serialize};
use tr_core::{Error, Result};

use crate::histogram::Axis;

/// Which pileup row of a [`PileupHistogram`] to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileupSlice {
    /// One configured pileup bin.
    Bin(usize),
    /// Aggregate over every pileup, including pileups outside the axis.
    Everything,
}

/// Dense (pileup bin, value bin) table of event counts.
///
/// Every fill lands in the aggregate row; it also lands in a pileup row when
/// the pileup axis has a bin for it. Counts only ever increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileupHistogram {
    name: String,
    pileup: Axis,
    values: Axis,
    /// Row-major, `pileup.n_bins()` rows of `values.n_bins()` counts.
    counts: Vec<u64>,
    everything: Vec<u64>,
    entries: u64,
}

impl PileupHistogram {
    /// Empty histogram.
    pub fn new(name: impl Into<String>, pileup: Axis, values: Axis) -> Self {
        let n_values = values.n_bins();
        Self {
            name: name.into(),
            counts: vec![0; pileup.n_bins() * n_values],
            everything: vec![0; n_values],
            pileup,
            values,
            entries: 0,
        }
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pileup axis.
    pub fn pileup_axis(&self) -> &Axis {
        &self.pileup
    }

    /// Value axis.
    pub fn value_axis(&self) -> &Axis {
        &self.values
    }

    /// Number of fills.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Count one event with the given pileup and value.
    pub fn fill(&mut self, pileup: f64, value: f64) {
        // Fold axes always yield a bin; a Drop value axis discards the entry.
        let Some(vb) = self.values.locate(value) else {
            return;
        };
        self.entries += 1;
        self.everything[vb] += 1;
        if let Some(pb) = self.pileup.locate(pileup) {
            self.counts[pb * self.values.n_bins() + vb] += 1;
        }
    }

    /// Content of one cell; `0` for indices outside the table.
    pub fn bin_content(&self, slice: PileupSlice, value_bin: usize) -> u64 {
        self.row(slice).and_then(|r| r.get(value_bin).copied()).unwrap_or(0)
    }

    /// All value-bin counts for one pileup slice.
    pub fn row(&self, slice: PileupSlice) -> Option<&[u64]> {
        let n = self.values.n_bins();
        match slice {
            PileupSlice::Everything => Some(self.everything.as_slice()),
            PileupSlice::Bin(k) if k < self.pileup.n_bins() => Some(&self.counts[k * n..(k + 1) * n]),
            PileupSlice::Bin(_) => None,
        }
    }

    /// Counts of the aggregate row.
    pub fn everything(&self) -> &[u64] {
        &self.everything
    }

    /// Add another histogram with identical binning into this one.
    pub fn merge(&mut self, other: &PileupHistogram) -> Result<()> {
        if self.pileup != other.pileup || self.values != other.values {
            return Err(Error::Validation(format!(
                "cannot merge histograms with different binning ('{}' vs '{}')",
                self.name, other.name
            )));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        for (a, b) in self.everything.iter_mut().zip(&other.everything) {
            *a += b;
        }
        self.entries += other.entries;
        Ok(())
    }
}

/// Pass counts along the pileup axis for a fixed list of thresholds.
///
/// `counts[t][p]` is the number of events with value `>= thresholds[t]` and
/// pileup in bin `p`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateVsPileup {
    name: String,
    thresholds: Vec<f64>,
    pileup: Axis,
    counts: Vec<Vec<u64>>,
}

impl RateVsPileup {
    /// Empty table.
    pub fn new(name: impl Into<String>, thresholds: Vec<f64>, pileup: Axis) -> Self {
        let counts = vec![vec![0; pileup.n_bins()]; thresholds.len()];
        Self { name: name.into(), thresholds, pileup, counts }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Physical thresholds, one row each.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Pileup axis.
    pub fn pileup_axis(&self) -> &Axis {
        &self.pileup
    }

    /// Pass counts per threshold.
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Count one event against every threshold.
    pub fn fill(&mut self, pileup: f64, value: f64) {
        let Some(pb) = self.pileup.locate(pileup) else {
            return;
        };
        for (row, &t) in self.counts.iter_mut().zip(&self.thresholds) {
            if value >= t {
                row[pb] += 1;
            }
        }
    }

    /// Add another table with identical thresholds and binning into this one.
    pub fn merge(&mut self, other: &RateVsPileup) -> Result<()> {
        if self.pileup != other.pileup || self.thresholds != other.thresholds {
            return Err(Error::Validation(format!(
                "cannot merge rate-vs-pileup tables with different layout ('{}' vs '{}')",
                self.name, other.name
            )));
        }
        for (row, other_row) in self.counts.iter_mut().zip(&other.counts) {
            for (a, b) in row.iter_mut().zip(other_row) {
                *a += b;
            }
        }
        Ok(())
    }
}
