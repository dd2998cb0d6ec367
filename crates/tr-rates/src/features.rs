//! Per-event extraction of the monitored quantities.

use tr_core::{Channel, Quantity, TriggerPath};

use crate::event::{Event, Jet, Sums};

/// |eta| boundary between central and forward jets.
pub const JET_ETA_BOUNDARY: f64 = 3.0;

/// Pileup used when the event carries no vertex count.
///
/// Every such event then falls into the one pileup bin containing 1.
pub const PILEUP_SENTINEL: f64 = 1.0;

/// Values of every monitored quantity for one event, both trigger paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelValues {
    /// Pileup proxy (vertex count or [`PILEUP_SENTINEL`]).
    pub pileup: f64,
    hardware: [f64; Quantity::ALL.len()],
    emulated: [f64; Quantity::ALL.len()],
}

impl ChannelValues {
    /// Value of `channel`.
    pub fn get(&self, channel: Channel) -> f64 {
        let idx = channel.quantity.index();
        match channel.path {
            TriggerPath::Hardware => self.hardware[idx],
            TriggerPath::Emulated => self.emulated[idx],
        }
    }

    /// `(channel, value)` for every channel in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        Channel::ALL.into_iter().map(move |ch| (ch, self.get(ch)))
    }
}

/// Derive pileup and every channel value from one event.
pub fn extract(event: &Event) -> ChannelValues {
    let pileup = event.n_vertex.map(f64::from).unwrap_or(PILEUP_SENTINEL);
    ChannelValues {
        pileup,
        hardware: path_values(&event.l1_sums, &event.l1_jets),
        emulated: path_values(&event.l1_emu_sums, &event.l1_emu_jets),
    }
}

fn path_values(sums: &Sums, jets: &[Jet]) -> [f64; Quantity::ALL.len()] {
    Quantity::ALL.map(|q| match q {
        Quantity::Ht => sums.htt.et,
        Quantity::MetBarrelEndcap => sums.met.et,
        Quantity::MetForward => sums.met_hf.et,
        Quantity::JetEtCentral => max_et(jets, |j| j.eta.abs() < JET_ETA_BOUNDARY),
        Quantity::JetEtForward => max_et(jets, |j| j.eta.abs() > JET_ETA_BOUNDARY),
        Quantity::JetEtAll => max_et(jets, |_| true),
    })
}

/// Largest `et` among jets passing `keep`; `0.0` when none do.
fn max_et(jets: &[Jet], keep: impl Fn(&Jet) -> bool) -> f64 {
    jets.iter().filter(|&j| keep(j)).map(|j| j.et).reduce(f64::max).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SumRecord;

    fn jet(et: f64, eta: f64) -> Jet {
        Jet { et, eta }
    }

    fn event() -> Event {
        Event {
            run: 1,
            lumi: 1,
            n_vertex: Some(23),
            l1_sums: Sums {
                htt: SumRecord { et: 310.0 },
                met: SumRecord { et: 55.0 },
                met_hf: SumRecord { et: 61.0 },
            },
            l1_emu_sums: Sums {
                htt: SumRecord { et: 305.5 },
                met: SumRecord { et: 52.0 },
                met_hf: SumRecord { et: 60.0 },
            },
            l1_jets: vec![jet(80.0, 0.2), jet(140.0, -2.9), jet(95.0, 3.4), jet(40.0, -4.1)],
            l1_emu_jets: vec![jet(70.0, 1.0), jet(33.0, 3.0)],
        }
    }

    #[test]
    fn energy_sums_are_read_per_path() {
        let v = extract(&event());
        assert_eq!(v.get(Channel::hardware(Quantity::Ht)), 310.0);
        assert_eq!(v.get(Channel::hardware(Quantity::MetForward)), 61.0);
        assert_eq!(v.get(Channel::emulated(Quantity::Ht)), 305.5);
        assert_eq!(v.get(Channel::emulated(Quantity::MetBarrelEndcap)), 52.0);
        assert_eq!(v.pileup, 23.0);
    }

    #[test]
    fn leading_jet_per_region() {
        let v = extract(&event());
        assert_eq!(v.get(Channel::hardware(Quantity::JetEtCentral)), 140.0);
        assert_eq!(v.get(Channel::hardware(Quantity::JetEtForward)), 95.0);
        assert_eq!(v.get(Channel::hardware(Quantity::JetEtAll)), 140.0);
    }

    #[test]
    fn boundary_jet_is_neither_central_nor_forward() {
        let v = extract(&event());
        assert_eq!(v.get(Channel::emulated(Quantity::JetEtCentral)), 70.0);
        assert_eq!(v.get(Channel::emulated(Quantity::JetEtForward)), 0.0);
        assert_eq!(v.get(Channel::emulated(Quantity::JetEtAll)), 70.0);
    }

    #[test]
    fn no_jets_and_no_vertices() {
        let mut ev = event();
        ev.n_vertex = None;
        ev.l1_jets.clear();
        let v = extract(&ev);
        assert_eq!(v.pileup, PILEUP_SENTINEL);
        assert_eq!(v.get(Channel::hardware(Quantity::JetEtAll)), 0.0);
        assert_eq!(v.get(Channel::hardware(Quantity::JetEtForward)), 0.0);
    }

    #[test]
    fn iter_covers_every_channel() {
        let v = extract(&event());
        let all: Vec<_> = v.iter().collect();
        assert_eq!(all.len(), Channel::ALL.len());
        assert_eq!(all[0], (Channel::hardware(Quantity::Ht), 310.0));
    }
}
