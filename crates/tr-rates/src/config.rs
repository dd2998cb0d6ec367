//! Analysis configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tr_core::{Channel, Error, Result, TriggerPath};
use tr_hist::{Axis, FlowPolicy};

/// Uniform binning `n_bins` over `[low, high)`; out-of-range values fold
/// into the edge bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinningConfig {
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge.
    pub low: f64,
    /// Upper edge.
    pub high: f64,
}

impl BinningConfig {
    /// Folding axis for this binning.
    pub fn axis(&self) -> Result<Axis> {
        Axis::uniform(self.n_bins, self.low, self.high, FlowPolicy::Fold)
    }
}

/// Rate study configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Trigger path under study (labels outputs).
    pub trigger_name: String,

    /// Hardware threshold bins to calibrate, by channel name.
    ///
    /// Emulated channels without an entry borrow their hardware channel's list.
    #[serde(default)]
    pub thresholds: BTreeMap<String, Vec<usize>>,

    /// Pileup bin edges.
    pub pu_bins: Vec<f64>,

    /// Golden JSON lumi mask. Relative paths resolve against the config file.
    #[serde(default)]
    pub lumi_json: Option<PathBuf>,

    /// Value binning of the rate histograms.
    #[serde(default = "default_rate_binning")]
    pub rate_binning: BinningConfig,

    /// Pileup binning of the rate-vs-pileup tables.
    #[serde(default = "default_pileup_binning")]
    pub pileup_binning: BinningConfig,
}

fn default_rate_binning() -> BinningConfig {
    BinningConfig { n_bins: 200, low: 0.0, high: 200.0 }
}

fn default_pileup_binning() -> BinningConfig {
    BinningConfig { n_bins: 16, low: 0.0, high: 80.0 }
}

impl RatesConfig {
    /// Minimal config: no thresholds, no lumi mask, default binnings.
    pub fn new(trigger_name: impl Into<String>, pu_bins: Vec<f64>) -> Self {
        Self {
            trigger_name: trigger_name.into(),
            thresholds: BTreeMap::new(),
            pu_bins,
            lumi_json: None,
            rate_binning: default_rate_binning(),
            pileup_binning: default_pileup_binning(),
        }
    }

    /// Set the threshold list of one channel.
    pub fn with_thresholds(mut self, channel: impl Into<String>, bins: Vec<usize>) -> Self {
        self.thresholds.insert(channel.into(), bins);
        self
    }

    /// Parse YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a `.json` file or, for any other extension, YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
        let mut cfg = if ext == "json" {
            Self::from_json_str(&text)?
        } else {
            // Default: YAML.
            Self::from_yaml_str(&text)?
        };

        if let Some(lumi) = &cfg.lumi_json
            && lumi.is_relative()
            && let Some(dir) = path.parent()
        {
            cfg.lumi_json = Some(dir.join(lumi));
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check binnings and threshold names.
    pub fn validate(&self) -> Result<()> {
        if self.trigger_name.trim().is_empty() {
            return Err(Error::Config("trigger_name must not be empty".into()));
        }
        self.pileup_axis().map_err(|e| Error::Config(format!("pu_bins: {e}")))?;
        self.rate_binning.axis().map_err(|e| Error::Config(format!("rate_binning: {e}")))?;
        self.pileup_binning.axis().map_err(|e| Error::Config(format!("pileup_binning: {e}")))?;

        for name in self.thresholds.keys() {
            if Channel::from_name(name).is_none() {
                return Err(Error::Config(format!("thresholds: unknown channel '{name}'")));
            }
        }
        Ok(())
    }

    /// Pileup axis of the rate histograms; pileups outside it only reach the aggregate row.
    pub fn pileup_axis(&self) -> Result<Axis> {
        Axis::from_edges(self.pu_bins.clone(), FlowPolicy::Drop)
    }

    /// Threshold bins configured for `channel`.
    ///
    /// An emulated channel without its own entry uses its hardware channel's.
    pub fn thresholds_for(&self, channel: Channel) -> Option<&[usize]> {
        if let Some(t) = self.thresholds.get(&channel.name()) {
            return Some(t.as_slice());
        }
        match channel.path {
            TriggerPath::Emulated => {
                self.thresholds.get(&channel.counterpart().name()).map(Vec::as_slice)
            }
            TriggerPath::Hardware => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr_core::Quantity;

    const YAML: &str = r#"
trigger_name: HW_Emu_jetMet
thresholds:
  HT: [120, 200, 320]
  METBE: [80, 100]
  METBE_Emu: [81]
pu_bins: [0, 10, 15, 20, 25, 30, 999]
lumi_json: golden.json
"#;

    #[test]
    fn parses_yaml_with_defaults() {
        let cfg = RatesConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(cfg.trigger_name, "HW_Emu_jetMet");
        assert_eq!(cfg.pu_bins.len(), 7);
        assert_eq!(cfg.rate_binning, BinningConfig { n_bins: 200, low: 0.0, high: 200.0 });
        assert_eq!(cfg.pileup_binning.n_bins, 16);
        assert_eq!(cfg.lumi_json.as_deref(), Some(Path::new("golden.json")));
        cfg.validate().unwrap();
    }

    #[test]
    fn emulated_channels_fall_back_to_hardware_thresholds() {
        let cfg = RatesConfig::from_yaml_str(YAML).unwrap();
        let ht_emu = Channel::emulated(Quantity::Ht);
        assert_eq!(cfg.thresholds_for(ht_emu), Some(&[120, 200, 320][..]));
        let met_emu = Channel::emulated(Quantity::MetBarrelEndcap);
        assert_eq!(cfg.thresholds_for(met_emu), Some(&[81][..]));
        assert_eq!(cfg.thresholds_for(Channel::hardware(Quantity::MetForward)), None);
        assert_eq!(cfg.thresholds_for(Channel::emulated(Quantity::MetForward)), None);
    }

    #[test]
    fn rejects_unknown_channels_and_bad_edges() {
        let cfg = RatesConfig::new("t", vec![0.0, 10.0]).with_thresholds("MHT", vec![1]);
        assert!(cfg.validate().unwrap_err().to_string().contains("unknown channel 'MHT'"));

        let cfg = RatesConfig::new("t", vec![10.0, 0.0]);
        assert!(cfg.validate().unwrap_err().to_string().contains("pu_bins"));

        let mut cfg = RatesConfig::new("t", vec![0.0, 10.0]);
        cfg.rate_binning.n_bins = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_config_parses() {
        let cfg = RatesConfig::from_json_str(
            r#"{"trigger_name": "x", "pu_bins": [0, 999], "thresholds": {"HT": [50]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.thresholds_for(Channel::hardware(Quantity::Ht)), Some(&[50][..]));
        assert!(cfg.lumi_json.is_none());
    }
}
