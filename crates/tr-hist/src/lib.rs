//! # tr-hist
//!
//! Count histograms for trigger-rate studies.
//!
//! - [`Axis`]: fixed binning with an explicit under/overflow policy.
//! - [`PileupHistogram`]: (pileup bin, value bin) counts plus an aggregate
//!   row over all pileups.
//! - [`RateVsPileup`]: per-threshold pass counts along the pileup axis.
//! - [`cumulative`] / [`normalize_to_collision_rate`] / [`RateCurve`]:
//!   "rate at or above threshold" curves.
//!
//! ## Example
//!
//! ```
//! use tr_hist::{Axis, FlowPolicy, PileupHistogram, RateCurve};
//!
//! let values = Axis::uniform(4, 0.0, 4.0, FlowPolicy::Fold).unwrap();
//! let pileup = Axis::from_edges(vec![0.0, 20.0, 40.0], FlowPolicy::Drop).unwrap();
//! let mut h = PileupHistogram::new("HT", pileup, values);
//! h.fill(12.0, 2.5);
//! h.fill(55.0, 9.0);
//!
//! let curve = RateCurve::from_histogram(&h).normalized();
//! assert_eq!(curve.values(), &[40_000_000.0, 40_000_000.0, 40_000_000.0, 20_000_000.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cumulative;
pub mod filler;
pub mod histogram;

pub use cumulative::{RateCurve, cumulative, normalize_to_collision_rate};
pub use filler::{PileupHistogram, PileupSlice, RateVsPileup};
pub use histogram::{Axis, FlowPolicy};
