//! Luminosity-section filtering.
//!
//! [`LumiMask`] answers "is this (run, lumi) good?" from a golden JSON file.
//! [`LumiGate`] sits in front of any [`LumiLookup`] and remembers the verdict
//! for the most recent (run, lumi) pair only.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tr_core::{Error, LumiKey, LumiLookup, Result};

/// Lookup counters of a [`LumiGate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LumiGateStats {
    /// Verdicts served from the cached pair.
    pub hits: u64,
    /// Verdicts that required a lookup.
    pub lookups: u64,
    /// Events admitted.
    pub admitted: u64,
    /// Events rejected.
    pub rejected: u64,
}

impl LumiGateStats {
    /// Fraction of verdicts served without a lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.lookups;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }

    /// Sum of two counters (for merging per-worker gates).
    pub fn combined(self, other: LumiGateStats) -> LumiGateStats {
        LumiGateStats {
            hits: self.hits + other.hits,
            lookups: self.lookups + other.lookups,
            admitted: self.admitted + other.admitted,
            rejected: self.rejected + other.rejected,
        }
    }
}

/// Single-entry verdict cache in front of a lumi lookup.
///
/// Only the last (run, lumi) pair is remembered. This deduplicates lookups
/// for lumi-sorted input, where consecutive events share a lumi section. On
/// unsorted input every change of pair costs a lookup again; verdicts stay
/// correct, only the saving is lost.
///
/// Without a filter every event is admitted.
#[derive(Debug, Clone)]
pub struct LumiGate<L> {
    filter: Option<L>,
    last: Option<(LumiKey, bool)>,
    stats: LumiGateStats,
}

impl<L: LumiLookup> LumiGate<L> {
    /// Gate in front of `filter`; `None` admits everything.
    pub fn new(filter: Option<L>) -> Self {
        Self { filter, last: None, stats: LumiGateStats::default() }
    }

    /// Whether events of `(run, lumi)` are processed.
    pub fn admit(&mut self, run: u32, lumi: u32) -> bool {
        let verdict = self.verdict(LumiKey::new(run, lumi));
        if verdict {
            self.stats.admitted += 1;
        } else {
            self.stats.rejected += 1;
        }
        verdict
    }

    fn verdict(&mut self, key: LumiKey) -> bool {
        let Some(filter) = &self.filter else {
            return true;
        };
        if let Some((last_key, last_verdict)) = self.last
            && last_key == key
        {
            self.stats.hits += 1;
            return last_verdict;
        }
        let verdict = filter.is_good(key.run, key.lumi);
        self.stats.lookups += 1;
        self.last = Some((key, verdict));
        verdict
    }

    /// Forget the cached pair and zero the counters.
    pub fn reset(&mut self) {
        self.last = None;
        self.stats = LumiGateStats::default();
    }

    /// Whether a filter is configured.
    pub fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    /// Counters since construction or the last [`reset`](Self::reset).
    pub fn stats(&self) -> LumiGateStats {
        self.stats
    }
}

/// Good lumi sections per run, as listed in a golden JSON file.
///
/// The format maps run numbers (as strings) to inclusive lumi ranges:
/// `{"315257": [[1, 88], [91, 92]], ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LumiMask {
    runs: BTreeMap<u32, Vec<(u32, u32)>>,
}

impl LumiMask {
    /// Parse golden JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<Vec<u32>>> = serde_json::from_str(json)?;
        let mut runs = BTreeMap::new();
        for (run, ranges) in raw {
            let run: u32 = run.trim().parse().map_err(|_| {
                Error::Validation(format!("lumi mask: run key '{run}' is not a run number"))
            })?;
            let mut parsed = Vec::with_capacity(ranges.len());
            for r in ranges {
                let &[first, last] = r.as_slice() else {
                    return Err(Error::Validation(format!(
                        "lumi mask: run {run} has a range with {} entries, expected 2",
                        r.len()
                    )));
                };
                if first > last {
                    return Err(Error::Validation(format!(
                        "lumi mask: run {run} has inverted range [{first}, {last}]"
                    )));
                }
                parsed.push((first, last));
            }
            parsed.sort_unstable();
            runs.insert(run, parsed);
        }
        Ok(Self { runs })
    }

    /// Load a golden JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mask = Self::from_json_str(&json)?;
        log::debug!("lumi mask {}: {} runs", path.display(), mask.n_runs());
        Ok(mask)
    }

    /// Whether lumi section `lumi` of `run` is listed.
    pub fn contains(&self, run: u32, lumi: u32) -> bool {
        self.runs
            .get(&run)
            .is_some_and(|ranges| ranges.iter().any(|&(first, last)| first <= lumi && lumi <= last))
    }

    /// Number of runs listed.
    pub fn n_runs(&self) -> usize {
        self.runs.len()
    }
}

impl LumiLookup for LumiMask {
    fn is_good(&self, run: u32, lumi: u32) -> bool {
        self.contains(run, lumi)
    }
}
