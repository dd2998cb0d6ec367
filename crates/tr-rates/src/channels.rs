//! Per-channel accumulators, built once from the static channel enumeration.

use std::collections::BTreeMap;

use tr_core::{Channel, Error, Result};
use tr_hist::{PileupHistogram, PileupSlice, RateVsPileup};

use crate::config::RatesConfig;
use crate::features::ChannelValues;

/// Accumulators owned by one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRates {
    /// (pileup bin, value bin) counts; the aggregate row feeds the rate curve.
    pub rates: PileupHistogram,
    /// Pass counts per configured threshold along the pileup axis.
    pub vs_pileup: RateVsPileup,
}

/// Static mapping from every [`Channel`] to its accumulators.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRegistry {
    channels: BTreeMap<Channel, ChannelRates>,
}

impl ChannelRegistry {
    /// Empty accumulators for every channel in [`Channel::ALL`].
    pub fn from_config(config: &RatesConfig) -> Result<Self> {
        let pileup = config.pileup_axis()?;
        let values = config.rate_binning.axis()?;
        let vs_pileup_axis = config.pileup_binning.axis()?;

        let mut channels = BTreeMap::new();
        for channel in Channel::ALL {
            let name = channel.name();
            let thresholds: Vec<f64> = config
                .thresholds_for(channel)
                .unwrap_or_default()
                .iter()
                .filter_map(|&bin| {
                    let t = values.low_edge(bin);
                    if t.is_none() {
                        log::warn!(
                            "{name}: threshold bin {bin} is outside {} value bins, skipped",
                            values.n_bins()
                        );
                    }
                    t
                })
                .collect();
            let vs_pileup =
                RateVsPileup::new(format!("L1 {name}"), thresholds, vs_pileup_axis.clone());
            let rates = ChannelRates {
                rates: PileupHistogram::new(name, pileup.clone(), values.clone()),
                vs_pileup,
            };
            channels.insert(channel, rates);
        }
        Ok(Self { channels })
    }

    /// Count one event with `value` for `channel`.
    pub fn fill(&mut self, channel: Channel, pileup: f64, value: f64) {
        if let Some(acc) = self.channels.get_mut(&channel) {
            acc.rates.fill(pileup, value);
            // Threshold rows see the low edge of the bin the rate histogram chose,
            // so folded and NaN values pass the same thresholds in both tables.
            let axis = acc.rates.value_axis();
            if let Some(edge) = axis.locate(value).and_then(|b| axis.low_edge(b)) {
                acc.vs_pileup.fill(pileup, edge);
            }
        }
    }

    /// Fill every channel from one event's extracted values.
    pub fn fill_all(&mut self, values: &ChannelValues) {
        for (channel, value) in values.iter() {
            self.fill(channel, values.pileup, value);
        }
    }

    /// Content of one rate-histogram cell.
    pub fn bin_content(&self, channel: Channel, slice: PileupSlice, value_bin: usize) -> u64 {
        self.channels.get(&channel).map_or(0, |acc| acc.rates.bin_content(slice, value_bin))
    }

    /// Accumulators of `channel`.
    pub fn get(&self, channel: Channel) -> Option<&ChannelRates> {
        self.channels.get(&channel)
    }

    /// Channels and accumulators in [`Channel::ALL`] order (hardware first).
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ChannelRates)> {
        Channel::ALL.into_iter().filter_map(|ch| self.channels.get(&ch).map(|acc| (ch, acc)))
    }

    /// Add another registry built from the same configuration into this one.
    pub fn merge(&mut self, other: &ChannelRegistry) -> Result<()> {
        for (channel, theirs) in &other.channels {
            let ours = self.channels.get_mut(channel).ok_or_else(|| {
                Error::Validation(format!("cannot merge registries: missing channel {channel}"))
            })?;
            ours.rates.merge(&theirs.rates)?;
            ours.vs_pileup.merge(&theirs.vs_pileup)?;
        }
        Ok(())
    }
}
