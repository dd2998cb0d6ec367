//! # tr-viz
//!
//! Plot-friendly JSON artifacts for rate studies.
//!
//! Artifacts are flat arrays aligned by index rather than nested objects, so
//! a plotting layer can overlay hardware and emulated curves directly.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Rate-vs-pileup artifacts.
pub mod pileup;

/// Rate curve overlay artifacts.
pub mod rates;

pub use pileup::{RateVsPileupArtifact, RateVsPileupRow};
pub use rates::{CalibratedThreshold, RateCurveArtifact, RatesArtifact};
