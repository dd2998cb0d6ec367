use serde::{Deserialize, Serialize};
use tr_core::Result;
use tr_rates::{ChannelPairRates, RatesSummary};

use crate::pileup::RateVsPileupArtifact;

const SCHEMA_VERSION: &str = "trigrate.rates.v1";

/// One hardware threshold and the emulator threshold matched to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedThreshold {
    /// Hardware threshold bin.
    pub hw_bin: usize,
    /// Hardware threshold (lower edge of `hw_bin`).
    pub hw_value: f64,
    /// Calibrated emulator bin.
    pub emu_bin: usize,
    /// Emulator threshold (lower edge of `emu_bin`).
    pub emu_value: f64,
    /// Normalized hardware rate at `hw_bin`.
    pub hw_rate: f64,
    /// Normalized emulator rate at `emu_bin`.
    pub emu_rate: f64,
}

/// Hardware and emulated rate curves of one quantity, ready for overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCurveArtifact {
    /// Hardware channel name.
    pub channel: String,
    /// Emulated channel name.
    pub emu_channel: String,
    /// Legend header for the eta acceptance.
    pub eta_label: String,
    /// Threshold values (lower bin edges), aligned with the curves.
    pub thresholds: Vec<f64>,
    /// Normalized hardware rate at each threshold.
    pub hw_rate: Vec<f64>,
    /// Normalized emulated rate at each threshold.
    pub emu_rate: Vec<f64>,
    /// Calibrated thresholds; empty when none are configured.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calibration: Vec<CalibratedThreshold>,
}

impl RateCurveArtifact {
    /// Build from one pair of the summary.
    pub fn from_pair(pair: &ChannelPairRates) -> Self {
        let hw = &pair.hardware;
        let emu = &pair.emulated;
        let calibration = pair
            .thresholds
            .iter()
            .flat_map(|map| map.entries().iter().copied())
            .map(|(hw_bin, emu_bin)| CalibratedThreshold {
                hw_bin,
                hw_value: hw.threshold_value(hw_bin).unwrap_or(f64::NAN),
                emu_bin,
                emu_value: emu.threshold_value(emu_bin).unwrap_or(f64::NAN),
                hw_rate: hw.rate_at(hw_bin).unwrap_or(0.0),
                emu_rate: emu.rate_at(emu_bin).unwrap_or(0.0),
            })
            .collect();

        Self {
            channel: pair.hardware_channel().name(),
            emu_channel: pair.emulated_channel().name(),
            eta_label: pair.quantity.eta_label().to_string(),
            thresholds: hw.edges().iter().take(hw.n_bins()).copied().collect(),
            hw_rate: hw.values().to_vec(),
            emu_rate: emu.values().to_vec(),
            calibration,
        }
    }
}

/// Top-level artifact of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesArtifact {
    /// Artifact schema identifier.
    pub schema_version: String,
    /// Trigger path under study.
    pub trigger_name: String,
    /// Events read.
    pub n_events: u64,
    /// Events admitted by the lumi filter.
    pub n_admitted: u64,
    /// Rate curves, one per quantity.
    pub rates: Vec<RateCurveArtifact>,
    /// Rate vs pileup, one per quantity and trigger path.
    pub rate_vs_pileup: Vec<RateVsPileupArtifact>,
}

impl RatesArtifact {
    /// Build every artifact of a run summary.
    pub fn from_summary(summary: &RatesSummary) -> Self {
        let rates = summary.pairs.iter().map(RateCurveArtifact::from_pair).collect();
        let rate_vs_pileup = summary
            .pairs
            .iter()
            .flat_map(|p| {
                [
                    RateVsPileupArtifact::from_table(p.hardware_channel(), &p.hardware_vs_pileup),
                    RateVsPileupArtifact::from_table(p.emulated_channel(), &p.emulated_vs_pileup),
                ]
            })
            .collect();
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            trigger_name: summary.trigger_name.clone(),
            n_events: summary.n_events,
            n_admitted: summary.n_admitted,
            rates,
            rate_vs_pileup,
        }
    }

    /// Pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
