//! Event loop and post-processing.

use std::borrow::Borrow;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tr_core::{Channel, Error, LumiLookup, Quantity, Result};
use tr_hist::{RateCurve, RateVsPileup};

use crate::calibrate::{ThresholdMap, calibrate_thresholds};
use crate::channels::ChannelRegistry;
use crate::config::RatesConfig;
use crate::event::Event;
use crate::features::extract;
use crate::lumi::{LumiGate, LumiGateStats, LumiMask};

/// Lumi lookup shared between the analyzer and its parallel workers.
pub type SharedLumiLookup = Arc<dyn LumiLookup + Send + Sync>;

/// Accumulates one run over events, then produces a [`RatesSummary`].
pub struct RatesAnalyzer {
    config: RatesConfig,
    lumi_filter: Option<SharedLumiLookup>,
    gate: LumiGate<SharedLumiLookup>,
    registry: ChannelRegistry,
    n_events: u64,
    /// Gate counters of finished parallel workers.
    worker_stats: LumiGateStats,
}

impl RatesAnalyzer {
    /// Analyzer with an explicit lumi filter (`None` admits every event).
    pub fn new(config: RatesConfig, lumi_filter: Option<SharedLumiLookup>) -> Result<Self> {
        config.validate()?;
        let registry = ChannelRegistry::from_config(&config)?;
        Ok(Self {
            gate: LumiGate::new(lumi_filter.clone()),
            lumi_filter,
            config,
            registry,
            n_events: 0,
            worker_stats: LumiGateStats::default(),
        })
    }

    /// Analyzer whose lumi filter is the configured golden JSON, if any.
    pub fn from_config(config: RatesConfig) -> Result<Self> {
        let lumi_filter = match &config.lumi_json {
            Some(path) => {
                let mask: SharedLumiLookup = Arc::new(LumiMask::from_path(path)?);
                Some(mask)
            }
            None => None,
        };
        Self::new(config, lumi_filter)
    }

    /// Configuration in use.
    pub fn config(&self) -> &RatesConfig {
        &self.config
    }

    /// Accumulators filled so far.
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Events seen so far, admitted or not.
    pub fn n_events(&self) -> u64 {
        self.n_events
    }

    /// Lumi gate counters so far.
    pub fn lumi_stats(&self) -> LumiGateStats {
        self.gate.stats().combined(self.worker_stats)
    }

    /// Gate, extract and fill one event. Returns whether it was admitted.
    pub fn process_event(&mut self, event: &Event) -> bool {
        self.n_events += 1;
        if !self.gate.admit(event.run, event.lumi) {
            return false;
        }
        self.registry.fill_all(&extract(event));
        true
    }

    /// Process events in order.
    pub fn process<I>(&mut self, events: I)
    where
        I: IntoIterator,
        I::Item: Borrow<Event>,
    {
        for event in events {
            self.process_event(event.borrow());
        }
    }

    /// Process a slice of events on `threads` rayon workers (0 = all cores).
    ///
    /// The slice is cut into contiguous chunks, each with its own lumi gate and
    /// accumulators, merged before returning. Contiguous chunks keep the lumi
    /// ordering each gate's single-entry cache relies on.
    pub fn process_parallel(&mut self, events: &[Event], threads: usize) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::Computation(format!("failed to build thread pool: {e}")))?;
        let n_workers = pool.current_num_threads().max(1);
        let chunk_len = events.len().div_ceil(n_workers);

        let partials: Vec<Result<(ChannelRegistry, LumiGateStats)>> = pool.install(|| {
            events
                .par_chunks(chunk_len)
                .map(|chunk| -> Result<(ChannelRegistry, LumiGateStats)> {
                    let mut gate = LumiGate::new(self.lumi_filter.clone());
                    let mut registry = ChannelRegistry::from_config(&self.config)?;
                    for event in chunk {
                        if gate.admit(event.run, event.lumi) {
                            registry.fill_all(&extract(event));
                        }
                    }
                    Ok((registry, gate.stats()))
                })
                .collect()
        });

        for partial in partials {
            let (registry, stats) = partial?;
            self.registry.merge(&registry)?;
            self.worker_stats = self.worker_stats.combined(stats);
        }
        self.n_events += events.len() as u64;
        log::debug!("processed {} events on {n_workers} workers", events.len());
        Ok(())
    }

    /// Build curves and calibrate thresholds for every hardware/emulated pair.
    pub fn finish(self) -> RatesSummary {
        let lumi_stats = self.lumi_stats();
        let pairs = Quantity::ALL
            .into_iter()
            .filter_map(|q| self.pair_rates(q))
            .collect();
        RatesSummary {
            trigger_name: self.config.trigger_name.clone(),
            n_events: self.n_events,
            n_admitted: lumi_stats.admitted,
            lumi_stats,
            pairs,
        }
    }

    fn pair_rates(&self, quantity: Quantity) -> Option<ChannelPairRates> {
        let hw = self.registry.get(Channel::hardware(quantity))?;
        let emu = self.registry.get(Channel::emulated(quantity))?;

        let hardware = RateCurve::from_histogram(&hw.rates).normalized();
        let emulated = RateCurve::from_histogram(&emu.rates).normalized();

        let name = quantity.name();
        let thresholds = match self.config.thresholds_for(Channel::hardware(quantity)) {
            Some(bins) => Some(calibrate_thresholds(name, &hardware, &emulated, bins)),
            None => {
                log::error!("{name}: no thresholds configured, calibration skipped");
                None
            }
        };

        Some(ChannelPairRates {
            quantity,
            hardware,
            emulated,
            thresholds,
            hardware_vs_pileup: hw.vs_pileup.clone(),
            emulated_vs_pileup: emu.vs_pileup.clone(),
        })
    }
}

/// Curves and calibration of one hardware/emulated channel pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPairRates {
    /// Measured quantity.
    pub quantity: Quantity,
    /// Normalized cumulative hardware curve.
    pub hardware: RateCurve,
    /// Normalized cumulative emulated curve.
    pub emulated: RateCurve,
    /// Calibrated emulator bins, `None` when no thresholds are configured.
    pub thresholds: Option<ThresholdMap>,
    /// Hardware pass counts vs pileup.
    pub hardware_vs_pileup: RateVsPileup,
    /// Emulated pass counts vs pileup.
    pub emulated_vs_pileup: RateVsPileup,
}

impl ChannelPairRates {
    /// Hardware channel.
    pub fn hardware_channel(&self) -> Channel {
        Channel::hardware(self.quantity)
    }

    /// Emulated channel.
    pub fn emulated_channel(&self) -> Channel {
        Channel::emulated(self.quantity)
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatesSummary {
    /// Trigger path under study.
    pub trigger_name: String,
    /// Events seen.
    pub n_events: u64,
    /// Events admitted by the lumi gate.
    pub n_admitted: u64,
    /// Lumi gate counters.
    pub lumi_stats: LumiGateStats,
    /// One entry per quantity, in [`Quantity::ALL`] order.
    pub pairs: Vec<ChannelPairRates>,
}

impl RatesSummary {
    /// Pair for `quantity`.
    pub fn pair(&self, quantity: Quantity) -> Option<&ChannelPairRates> {
        self.pairs.iter().find(|p| p.quantity == quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Jet, SumRecord, Sums};
    use tr_core::FnLookup;
    use tr_hist::PileupSlice;

    fn event(run: u32, lumi: u32, ht: f64, emu_ht: f64) -> Event {
        Event {
            run,
            lumi,
            n_vertex: Some(12),
            l1_sums: Sums { htt: SumRecord { et: ht }, ..Sums::default() },
            l1_emu_sums: Sums { htt: SumRecord { et: emu_ht }, ..Sums::default() },
            l1_jets: vec![Jet { et: ht / 2.0, eta: 1.0 }],
            l1_emu_jets: vec![],
        }
    }

    fn config() -> RatesConfig {
        RatesConfig::new("test", vec![0.0, 10.0, 20.0]).with_thresholds("HT", vec![50])
    }

    #[test]
    fn rejected_lumis_are_not_filled() {
        let only_lumi_1: SharedLumiLookup = Arc::new(FnLookup(|_run: u32, lumi: u32| lumi == 1));
        let mut analyzer = RatesAnalyzer::new(config(), Some(only_lumi_1)).unwrap();
        assert!(analyzer.process_event(&event(1, 1, 60.0, 60.0)));
        assert!(!analyzer.process_event(&event(1, 2, 60.0, 60.0)));

        let ht = Channel::hardware(Quantity::Ht);
        assert_eq!(analyzer.registry().bin_content(ht, PileupSlice::Everything, 60), 1);
        assert_eq!(analyzer.n_events(), 2);
        assert_eq!(analyzer.lumi_stats().rejected, 1);
    }

    #[test]
    fn summary_has_every_pair_and_calibrates_configured_ones() {
        let mut analyzer = RatesAnalyzer::new(config(), None).unwrap();
        let events: Vec<Event> =
            (0..100).map(|i| event(1, 1, f64::from(i), f64::from(i) + 5.0)).collect();
        analyzer.process(&events);

        let summary = analyzer.finish();
        assert_eq!(summary.pairs.len(), Quantity::ALL.len());
        assert_eq!(summary.n_events, 100);
        assert_eq!(summary.n_admitted, 100);

        let ht = summary.pair(Quantity::Ht).unwrap();
        let map = ht.thresholds.as_ref().unwrap();
        // Emulated HT is shifted up by 5 GeV.
        assert_eq!(map.get(50), Some(55));
        assert!(summary.pair(Quantity::MetForward).unwrap().thresholds.is_none());
    }

    #[test]
    fn parallel_matches_sequential() {
        let events: Vec<Event> = (0..1000)
            .map(|i| event(1, i / 100, f64::from(i % 230), f64::from((i * 7) % 230)))
            .collect();
        let lookup: SharedLumiLookup = Arc::new(FnLookup(|_run: u32, lumi: u32| lumi % 3 != 0));

        let mut seq = RatesAnalyzer::new(config(), Some(lookup.clone())).unwrap();
        seq.process(events.iter());
        let mut par = RatesAnalyzer::new(config(), Some(lookup)).unwrap();
        par.process_parallel(&events, 4).unwrap();

        assert_eq!(seq.registry(), par.registry());
        assert_eq!(seq.lumi_stats().admitted, par.lumi_stats().admitted);
        assert_eq!(seq.finish().pairs, par.finish().pairs);
    }
}
