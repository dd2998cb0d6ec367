//! # tr-core
//!
//! Shared vocabulary for trigrate: the error type, the static channel
//! enumeration and the luminosity lookup seam.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{FnLookup, LumiLookup};
pub use types::{
    Channel, Domain, EMU_SUFFIX, LumiKey, Quantity, REFERENCE_COLLISION_RATE, Region, TriggerPath,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
