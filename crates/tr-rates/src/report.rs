//! Plain-text threshold report.

use std::fmt::Write as _;

use crate::analyzer::{ChannelPairRates, RatesSummary};

/// `"<channel>: [a, b]"` and `"<channel>_Emu: [c, d]"` for one pair, or
/// `None` when the pair has no thresholds configured.
pub fn pair_lines(pair: &ChannelPairRates) -> Option<(String, String)> {
    let map = pair.thresholds.as_ref()?;
    Some((
        format!("{}: {}", pair.hardware_channel(), format_list(&map.hardware_bins())),
        format!("{}: {}", pair.emulated_channel(), format_list(&map.emulator_bins())),
    ))
}

/// Report lines of every calibrated pair, in channel enumeration order.
pub fn threshold_report(summary: &RatesSummary) -> String {
    let mut out = String::new();
    for (hw, emu) in summary.pairs.iter().filter_map(pair_lines) {
        let _ = writeln!(out, "{hw}");
        let _ = writeln!(out, "{emu}");
    }
    out
}

fn format_list(values: &[usize]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RatesAnalyzer;
    use crate::config::RatesConfig;
    use crate::event::{Event, SumRecord, Sums};

    #[test]
    fn list_formatting() {
        assert_eq!(format_list(&[]), "[]");
        assert_eq!(format_list(&[20, 30, 40]), "[20, 30, 40]");
    }

    #[test]
    fn report_lists_calibrated_pairs_only() {
        let config = RatesConfig::new("t", vec![0.0, 100.0])
            .with_thresholds("METBE", vec![10, 20])
            .with_thresholds("HT", vec![30]);
        let mut analyzer = RatesAnalyzer::new(config, None).unwrap();
        for i in 0..50 {
            let sums = Sums {
                htt: SumRecord { et: f64::from(i) },
                met: SumRecord { et: f64::from(i) },
                met_hf: SumRecord { et: 0.0 },
            };
            analyzer.process_event(&Event {
                run: 1,
                lumi: 1,
                n_vertex: None,
                l1_sums: sums,
                l1_emu_sums: sums,
                l1_jets: vec![],
                l1_emu_jets: vec![],
            });
        }
        let report = threshold_report(&analyzer.finish());
        assert_eq!(report, "HT: [30]\nHT_Emu: [30]\nMETBE: [10, 20]\nMETBE_Emu: [10, 20]\n");
    }
}
