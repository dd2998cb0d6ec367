//! Channel identities and shared constants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Assumed total collision rate that normalized curves are scaled to.
pub const REFERENCE_COLLISION_RATE: f64 = 40_000_000.0;

/// Suffix carried by emulated channel names.
pub const EMU_SUFFIX: &str = "_Emu";

/// Which trigger path produced a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerPath {
    /// Hardware trigger readout.
    Hardware,
    /// Software emulation of the hardware trigger.
    Emulated,
}

/// Kind of monitored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Global energy sum (HT, missing ET).
    EnergySum,
    /// Leading jet transverse energy.
    JetEt,
}

/// Detector region a quantity is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Barrel and endcap calorimeters.
    BarrelEndcap,
    /// Forward calorimeter only.
    Forward,
    /// Full acceptance, forward calorimeter included.
    All,
}

/// Monitored physical quantity, independent of the trigger path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quantity {
    /// Scalar sum of jet ET.
    Ht,
    /// Missing ET without the forward calorimeter.
    MetBarrelEndcap,
    /// Missing ET including the forward calorimeter.
    MetForward,
    /// Leading jet ET, |eta| < 3.0.
    JetEtCentral,
    /// Leading jet ET, |eta| > 3.0.
    JetEtForward,
    /// Leading jet ET over all jets.
    JetEtAll,
}

impl Quantity {
    /// Every quantity, in report order.
    pub const ALL: [Quantity; 6] = [
        Quantity::Ht,
        Quantity::MetBarrelEndcap,
        Quantity::MetForward,
        Quantity::JetEtCentral,
        Quantity::JetEtForward,
        Quantity::JetEtAll,
    ];

    /// Position in [`Quantity::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Hardware channel name.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Ht => "HT",
            Quantity::MetBarrelEndcap => "METBE",
            Quantity::MetForward => "METHF",
            Quantity::JetEtCentral => "JetET_BE",
            Quantity::JetEtForward => "JetET_HF",
            Quantity::JetEtAll => "JetET",
        }
    }

    /// Energy sum or jet ET.
    pub fn domain(self) -> Domain {
        match self {
            Quantity::Ht | Quantity::MetBarrelEndcap | Quantity::MetForward => Domain::EnergySum,
            Quantity::JetEtCentral | Quantity::JetEtForward | Quantity::JetEtAll => Domain::JetEt,
        }
    }

    /// Region tag.
    pub fn region(self) -> Region {
        match self {
            Quantity::Ht | Quantity::MetBarrelEndcap | Quantity::JetEtCentral => {
                Region::BarrelEndcap
            }
            Quantity::MetForward | Quantity::JetEtAll => Region::All,
            Quantity::JetEtForward => Region::Forward,
        }
    }

    /// Legend label for the eta acceptance (LaTeX-ish, display only).
    pub fn eta_label(self) -> &'static str {
        match self {
            Quantity::Ht => "|\\eta| < 2.4",
            Quantity::MetBarrelEndcap => "|\\eta| < 3.0",
            Quantity::MetForward => "|\\eta| < 5.0",
            Quantity::JetEtCentral => "|\\eta| < 3.0",
            Quantity::JetEtForward => "3.0 < |\\eta| < 5.0",
            Quantity::JetEtAll => "|\\eta| < 5.0",
        }
    }
}

/// One monitored quantity in one trigger path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Channel {
    /// What is measured.
    pub quantity: Quantity,
    /// Hardware or emulated.
    pub path: TriggerPath,
}

impl Channel {
    /// Static channel enumeration: every quantity, hardware before emulated.
    pub const ALL: [Channel; 12] = [
        Channel::hardware(Quantity::Ht),
        Channel::hardware(Quantity::MetBarrelEndcap),
        Channel::hardware(Quantity::MetForward),
        Channel::hardware(Quantity::JetEtCentral),
        Channel::hardware(Quantity::JetEtForward),
        Channel::hardware(Quantity::JetEtAll),
        Channel::emulated(Quantity::Ht),
        Channel::emulated(Quantity::MetBarrelEndcap),
        Channel::emulated(Quantity::MetForward),
        Channel::emulated(Quantity::JetEtCentral),
        Channel::emulated(Quantity::JetEtForward),
        Channel::emulated(Quantity::JetEtAll),
    ];

    /// Hardware channel for `quantity`.
    pub const fn hardware(quantity: Quantity) -> Self {
        Self { quantity, path: TriggerPath::Hardware }
    }

    /// Emulated channel for `quantity`.
    pub const fn emulated(quantity: Quantity) -> Self {
        Self { quantity, path: TriggerPath::Emulated }
    }

    /// Channel name, e.g. `METBE` or `METBE_Emu`.
    pub fn name(&self) -> String {
        match self.path {
            TriggerPath::Hardware => self.quantity.name().to_string(),
            TriggerPath::Emulated => format!("{}{EMU_SUFFIX}", self.quantity.name()),
        }
    }

    /// Parse a channel name produced by [`Channel::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let (base, path) = match name.strip_suffix(EMU_SUFFIX) {
            Some(base) => (base, TriggerPath::Emulated),
            None => (name, TriggerPath::Hardware),
        };
        Quantity::ALL
            .into_iter()
            .find(|q| q.name() == base)
            .map(|quantity| Self { quantity, path })
    }

    /// The same quantity in the other trigger path.
    pub fn counterpart(&self) -> Self {
        let path = match self.path {
            TriggerPath::Hardware => TriggerPath::Emulated,
            TriggerPath::Emulated => TriggerPath::Hardware,
        };
        Self { quantity: self.quantity, path }
    }

    /// Energy sum or jet ET.
    pub fn domain(&self) -> Domain {
        self.quantity.domain()
    }

    /// Region tag.
    pub fn region(&self) -> Region {
        self.quantity.region()
    }

    /// Display label for the eta acceptance.
    pub fn eta_label(&self) -> &'static str {
        self.quantity.eta_label()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.quantity.name())?;
        if self.path == TriggerPath::Emulated {
            f.write_str(EMU_SUFFIX)?;
        }
        Ok(())
    }
}

/// A (run, lumi section) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LumiKey {
    /// Run number.
    pub run: u32,
    /// Lumi section within the run.
    pub lumi: u32,
}

impl LumiKey {
    /// Create a key.
    pub fn new(run: u32, lumi: u32) -> Self {
        Self { run, lumi }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_enumeration() {
        for ch in Channel::ALL {
            assert_eq!(Channel::from_name(&ch.name()), Some(ch));
            assert_eq!(ch.to_string(), ch.name());
        }
        assert_eq!(Channel::from_name("MHT"), None);
        assert_eq!(Channel::from_name("_Emu"), None);
    }

    #[test]
    fn emulated_names_carry_suffix() {
        let ch = Channel::emulated(Quantity::JetEtForward);
        assert_eq!(ch.name(), "JetET_HF_Emu");
        assert_eq!(ch.counterpart(), Channel::hardware(Quantity::JetEtForward));
        assert_eq!(ch.eta_label(), "3.0 < |\\eta| < 5.0");
    }

    #[test]
    fn index_matches_enumeration() {
        for (i, q) in Quantity::ALL.into_iter().enumerate() {
            assert_eq!(q.index(), i);
        }
    }

    #[test]
    fn domains_and_regions() {
        assert_eq!(Quantity::Ht.domain(), Domain::EnergySum);
        assert_eq!(Quantity::JetEtAll.domain(), Domain::JetEt);
        assert_eq!(Quantity::JetEtForward.region(), Region::Forward);
        assert_eq!(Channel::hardware(Quantity::MetBarrelEndcap).region(), Region::BarrelEndcap);
    }
}
