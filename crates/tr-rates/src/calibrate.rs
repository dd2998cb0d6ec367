//! Matching emulator thresholds to hardware thresholds by rate.

use serde::{Deserialize, Serialize};
use tr_core::{Error, REFERENCE_COLLISION_RATE, Result};
use tr_hist::RateCurve;

/// Emulator bin whose rate best matches the hardware rate at `hw_threshold_bin`.
///
/// Discrepancy at bin `i` is `|target - emu[i]|`, except that a zero target
/// or a zero `emu[i]` counts as the largest possible discrepancy
/// ([`REFERENCE_COLLISION_RATE`]): a zero rate is not comparable to a small
/// non-zero one. Ties go to the lowest bin.
pub fn calibrate(hw_curve: &[f64], emu_curve: &[f64], hw_threshold_bin: usize) -> Result<usize> {
    let Some(&target) = hw_curve.get(hw_threshold_bin) else {
        return Err(Error::Validation(format!(
            "threshold bin {hw_threshold_bin} outside hardware curve of {} bins",
            hw_curve.len()
        )));
    };
    if emu_curve.is_empty() {
        return Err(Error::Validation("emulator curve has no bins".into()));
    }

    let mut best = 0;
    let mut best_delta = f64::INFINITY;
    for (i, &emu) in emu_curve.iter().enumerate() {
        let delta = if target == 0.0 || emu == 0.0 {
            REFERENCE_COLLISION_RATE
        } else {
            (target - emu).abs()
        };
        if delta < best_delta {
            best = i;
            best_delta = delta;
        }
    }
    Ok(best)
}

/// Calibrated emulator bin for each hardware threshold bin of one channel pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMap {
    entries: Vec<(usize, usize)>,
}

impl ThresholdMap {
    /// `(hardware bin, emulator bin)` in configuration order.
    pub fn entries(&self) -> &[(usize, usize)] {
        &self.entries
    }

    /// Hardware threshold bins.
    pub fn hardware_bins(&self) -> Vec<usize> {
        self.entries.iter().map(|&(hw, _)| hw).collect()
    }

    /// Calibrated emulator bins.
    pub fn emulator_bins(&self) -> Vec<usize> {
        self.entries.iter().map(|&(_, emu)| emu).collect()
    }

    /// Emulator bin calibrated for `hw_bin`.
    pub fn get(&self, hw_bin: usize) -> Option<usize> {
        self.entries.iter().find(|&&(hw, _)| hw == hw_bin).map(|&(_, emu)| emu)
    }

    /// Number of calibrated thresholds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was calibrated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run [`calibrate`] for every threshold; thresholds that cannot be
/// calibrated are logged and left out.
pub fn calibrate_thresholds(
    name: &str,
    hw_curve: &RateCurve,
    emu_curve: &RateCurve,
    thresholds: &[usize],
) -> ThresholdMap {
    let mut entries = Vec::with_capacity(thresholds.len());
    for &hw_bin in thresholds {
        match calibrate(hw_curve.values(), emu_curve.values(), hw_bin) {
            Ok(emu_bin) => entries.push((hw_bin, emu_bin)),
            Err(e) => log::error!("{name}: cannot calibrate threshold {hw_bin}: {e}"),
        }
    }
    ThresholdMap { entries }
}
