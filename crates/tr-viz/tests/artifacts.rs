//! Artifact construction from a processed run.

use approx::assert_relative_eq;
use tr_core::{REFERENCE_COLLISION_RATE, TriggerPath};
use tr_rates::{Event, RatesAnalyzer, RatesConfig, SumRecord, Sums};
use tr_viz::RatesArtifact;

fn summary() -> tr_rates::RatesSummary {
    let config = RatesConfig::new("artifact", vec![0.0, 30.0, 60.0])
        .with_thresholds("HT", vec![20, 60])
        .with_thresholds("METBE", vec![10]);
    let mut analyzer = RatesAnalyzer::new(config, None).unwrap();
    for i in 0..80u32 {
        let v = f64::from(i);
        let sums = Sums {
            htt: SumRecord { et: v },
            met: SumRecord { et: v / 2.0 },
            met_hf: SumRecord { et: v / 2.0 },
        };
        analyzer.process_event(&Event {
            run: 1,
            lumi: 1,
            n_vertex: Some(i % 40),
            l1_sums: sums,
            l1_emu_sums: sums,
            l1_jets: vec![],
            l1_emu_jets: vec![],
        });
    }
    analyzer.finish()
}

#[test]
fn rate_artifacts_align_thresholds_and_rates() {
    let artifact = RatesArtifact::from_summary(&summary());
    assert_eq!(artifact.schema_version, "trigrate.rates.v1");
    assert_eq!(artifact.trigger_name, "artifact");
    assert_eq!(artifact.n_events, 80);
    assert_eq!(artifact.rates.len(), 6);

    let ht = &artifact.rates[0];
    assert_eq!(ht.channel, "HT");
    assert_eq!(ht.emu_channel, "HT_Emu");
    assert_eq!(ht.thresholds.len(), 200);
    assert_eq!(ht.hw_rate.len(), 200);
    assert_eq!(ht.thresholds[20], 20.0);
    assert_eq!(ht.hw_rate[0], REFERENCE_COLLISION_RATE);
    assert_relative_eq!(ht.hw_rate[20], REFERENCE_COLLISION_RATE * 60.0 / 80.0);

    assert_eq!(ht.calibration.len(), 2);
    let c = &ht.calibration[1];
    assert_eq!((c.hw_bin, c.emu_bin), (60, 60));
    assert_eq!(c.hw_value, 60.0);
    assert_relative_eq!(c.emu_rate, c.hw_rate);

    // No thresholds configured for the forward MET pair.
    assert!(artifact.rates[2].calibration.is_empty());
}

#[test]
fn rate_vs_pileup_has_both_paths() {
    let artifact = RatesArtifact::from_summary(&summary());
    assert_eq!(artifact.rate_vs_pileup.len(), 12);

    let ht = &artifact.rate_vs_pileup[0];
    assert_eq!(ht.channel, "HT");
    assert_eq!(ht.path, TriggerPath::Hardware);
    assert_eq!(ht.title, "L1 HT");
    assert_eq!(ht.pileup_edges.len(), 17);
    assert_eq!(ht.rows.len(), 2);
    assert_eq!(ht.rows[0].threshold, 20.0);
    assert_eq!(ht.rows[0].counts.iter().sum::<u64>(), 60);
    assert_eq!(ht.rows[1].counts.iter().sum::<u64>(), 20);

    let ht_emu = &artifact.rate_vs_pileup[1];
    assert_eq!(ht_emu.channel, "HT_Emu");
    assert_eq!(ht_emu.path, TriggerPath::Emulated);
    assert_eq!(ht_emu.rows.len(), 2);
}

#[test]
fn artifact_serializes_to_json() {
    let json = RatesArtifact::from_summary(&summary()).to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["rates"][1]["channel"], "METBE");
    assert_eq!(value["rates"][1]["calibration"][0]["hw_bin"], 10);
    assert!(value["rates"][2].get("calibration").is_none());
}
