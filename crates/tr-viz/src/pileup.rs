use serde::{Deserialize, Serialize};
use tr_core::{Channel, TriggerPath};
use tr_hist::RateVsPileup;

/// Pass counts for one threshold, aligned with the pileup bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateVsPileupRow {
    /// Threshold value.
    pub threshold: f64,
    /// Events at or above `threshold`, per pileup bin.
    pub counts: Vec<u64>,
}

/// Rate-vs-pileup table of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateVsPileupArtifact {
    /// Channel name.
    pub channel: String,
    /// Hardware or emulated.
    pub path: TriggerPath,
    /// Plot title.
    pub title: String,
    /// Pileup bin edges (length = bins + 1).
    pub pileup_edges: Vec<f64>,
    /// One row per threshold.
    pub rows: Vec<RateVsPileupRow>,
}

impl RateVsPileupArtifact {
    /// Build from an accumulated table.
    pub fn from_table(channel: Channel, table: &RateVsPileup) -> Self {
        let rows = table
            .thresholds()
            .iter()
            .zip(table.counts())
            .map(|(&threshold, counts)| RateVsPileupRow { threshold, counts: counts.clone() })
            .collect();
        Self {
            channel: channel.name(),
            path: channel.path,
            title: table.name().to_string(),
            pileup_edges: table.pileup_axis().edges().to_vec(),
            rows,
        }
    }
}
