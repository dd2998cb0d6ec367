//! Fixed binning along one axis.

use serde::{Deserialize, Serialize};
use tr_core::{Error, Result};

/// Under/overflow handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowPolicy {
    /// Entries outside the axis range have no bin.
    Drop,
    /// Fold underflow into the first bin and overflow into the last bin.
    ///
    /// NaN folds into the first bin so that every entry lands somewhere.
    Fold,
}

/// Sorted bin edges plus a flow policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    edges: Vec<f64>,
    flow: FlowPolicy,
}

impl Axis {
    /// Axis from explicit edges (length = n_bins + 1, strictly increasing, finite).
    pub fn from_edges(edges: Vec<f64>, flow: FlowPolicy) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::Validation(format!(
                "axis needs at least 2 edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::Validation(format!("axis edges must be finite: {edges:?}")));
        }
        if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::Validation(format!(
                "axis edges must be strictly increasing ({} >= {})",
                w[0], w[1]
            )));
        }
        Ok(Self { edges, flow })
    }

    /// `n_bins` equal-width bins over `[low, high)`.
    pub fn uniform(n_bins: usize, low: f64, high: f64, flow: FlowPolicy) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::Validation("axis needs at least one bin".into()));
        }
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(Error::Validation(format!(
                "invalid axis range: expected low < high, got ({low}, {high})"
            )));
        }
        let width = (high - low) / n_bins as f64;
        let mut edges: Vec<f64> = (0..n_bins).map(|i| low + width * i as f64).collect();
        edges.push(high);
        Self::from_edges(edges, flow)
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin edges (length = n_bins + 1).
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Flow policy.
    pub fn flow(&self) -> FlowPolicy {
        self.flow
    }

    /// Lower edge of the first bin.
    pub fn low(&self) -> f64 {
        self.edges[0]
    }

    /// Upper edge of the last bin.
    pub fn high(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Lower edge of bin `i`, i.e. the physical threshold a bin index stands for.
    pub fn low_edge(&self, i: usize) -> Option<f64> {
        if i < self.n_bins() { Some(self.edges[i]) } else { None }
    }

    /// Bin index for `val` under this axis' flow policy.
    ///
    /// `None` only for out-of-range (or NaN) values with [`FlowPolicy::Drop`].
    pub fn locate(&self, val: f64) -> Option<usize> {
        match find_bin(&self.edges, val) {
            Some(b) => Some(b),
            None => match self.flow {
                FlowPolicy::Drop => None,
                FlowPolicy::Fold if val >= self.high() => Some(self.n_bins() - 1),
                FlowPolicy::Fold => Some(0),
            },
        }
    }
}

/// Find the bin index for a value given sorted bin edges.
///
/// Returns `None` for underflow/overflow/NaN.
fn find_bin(edges: &[f64], val: f64) -> Option<usize> {
    if val.is_nan() || val < edges[0] || val >= edges[edges.len() - 1] {
        return None;
    }
    match edges.binary_search_by(|e| e.total_cmp(&val)) {
        Ok(i) if i < edges.len() - 1 => Some(i),
        Ok(_) => None,
        Err(0) => None,
        Err(i) => Some(i - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_bin_edge_cases() {
        let edges = vec![0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_bin(&edges, -0.5), None);
        assert_eq!(find_bin(&edges, 3.0), None);
        assert_eq!(find_bin(&edges, f64::NAN), None);
        assert_eq!(find_bin(&edges, 0.0), Some(0));
        assert_eq!(find_bin(&edges, 1.0), Some(1));
        assert_eq!(find_bin(&edges, 2.99), Some(2));
    }

    #[test]
    fn uniform_edges() {
        let ax = Axis::uniform(200, 0.0, 200.0, FlowPolicy::Fold).unwrap();
        assert_eq!(ax.n_bins(), 200);
        assert_eq!(ax.edges()[0], 0.0);
        assert_eq!(ax.edges()[57], 57.0);
        assert_eq!(ax.high(), 200.0);
        assert_eq!(ax.low_edge(120), Some(120.0));
        assert_eq!(ax.low_edge(200), None);
    }

    #[test]
    fn fold_clamps_to_edge_bins() {
        let ax = Axis::uniform(16, 0.0, 80.0, FlowPolicy::Fold).unwrap();
        assert_eq!(ax.locate(-3.0), Some(0));
        assert_eq!(ax.locate(80.0), Some(15));
        assert_eq!(ax.locate(1e9), Some(15));
        assert_eq!(ax.locate(f64::NAN), Some(0));
        assert_eq!(ax.locate(f64::INFINITY), Some(15));
        assert_eq!(ax.locate(7.5), Some(1));
    }

    #[test]
    fn drop_has_no_bin_outside_range() {
        let ax = Axis::from_edges(vec![0.0, 10.0, 15.0, 999.0], FlowPolicy::Drop).unwrap();
        assert_eq!(ax.locate(-1.0), None);
        assert_eq!(ax.locate(999.0), None);
        assert_eq!(ax.locate(12.0), Some(1));
        assert_eq!(ax.locate(1.0), Some(0));
    }

    #[test]
    fn rejects_bad_edges() {
        assert!(Axis::from_edges(vec![1.0], FlowPolicy::Drop).is_err());
        assert!(Axis::from_edges(vec![0.0, 5.0, 5.0], FlowPolicy::Drop).is_err());
        assert!(Axis::from_edges(vec![0.0, f64::NAN], FlowPolicy::Drop).is_err());
        assert!(Axis::uniform(0, 0.0, 1.0, FlowPolicy::Fold).is_err());
        assert!(Axis::uniform(4, 2.0, 1.0, FlowPolicy::Fold).is_err());
    }
}
