//! # tr-rates
//!
//! Trigger-rate curves for a hardware trigger path and its emulation, and
//! the emulator thresholds that reproduce the hardware rates.
//!
//! Per event: [`LumiGate`] decides inclusion, [`extract`] derives the
//! monitored quantities and [`ChannelRegistry`] fills every channel. After
//! the loop, [`RatesAnalyzer::finish`] builds normalized cumulative curves
//! and runs [`calibrate`] for every configured hardware threshold.
//!
//! ```no_run
//! use tr_rates::{EventReader, RatesAnalyzer, RatesConfig};
//!
//! let config = RatesConfig::from_path("rates.yaml").unwrap();
//! let mut analyzer = RatesAnalyzer::from_config(config).unwrap();
//! for event in EventReader::open("events.jsonl").unwrap() {
//!     analyzer.process_event(&event.unwrap());
//! }
//! let summary = analyzer.finish();
//! print!("{}", tr_rates::report::threshold_report(&summary));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod calibrate;
pub mod channels;
pub mod config;
pub mod event;
pub mod features;
pub mod lumi;
pub mod report;

pub use analyzer::{ChannelPairRates, RatesAnalyzer, RatesSummary, SharedLumiLookup};
pub use calibrate::{ThresholdMap, calibrate, calibrate_thresholds};
pub use channels::{ChannelRates, ChannelRegistry};
pub use config::{BinningConfig, RatesConfig};
pub use event::{Event, EventReader, Jet, SumRecord, Sums};
pub use features::{ChannelValues, JET_ETA_BOUNDARY, PILEUP_SENTINEL, extract};
pub use lumi::{LumiGate, LumiGateStats, LumiMask};
