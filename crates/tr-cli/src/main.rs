//! trigrate CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tr_rates::{Event, EventReader, RatesAnalyzer, RatesConfig, RatesSummary};
use tr_viz::RatesArtifact;

#[derive(Parser)]
#[command(name = "trigrate")]
#[command(about = "trigrate - Trigger rates and hardware/emulator threshold calibration")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute rate curves and calibrate emulator thresholds
    Rates {
        /// Analysis config (YAML, or JSON by extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Events (JSON Lines, one event per line)
        #[arg(short, long)]
        events: PathBuf,

        /// Output file for the rates artifact (pretty JSON). Omit to print the report only.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). 1 streams events without loading them all.
        #[arg(long, default_value = "1")]
        threads: usize,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Rates { config, events, output, threads } => {
            cmd_rates(&config, &events, output.as_deref(), threads)
        }
        Commands::Version => {
            println!("trigrate {}", tr_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_rates(config: &Path, events: &Path, output: Option<&Path>, threads: usize) -> Result<()> {
    tracing::info!(path = %config.display(), "loading config");
    let cfg = RatesConfig::from_path(config)
        .with_context(|| format!("failed to load config {}", config.display()))?;
    tracing::info!(
        trigger = %cfg.trigger_name,
        pileup_bins = cfg.pu_bins.len().saturating_sub(1),
        lumi_mask = cfg.lumi_json.is_some(),
        "config loaded"
    );

    let mut analyzer = RatesAnalyzer::from_config(cfg)?;
    let reader = EventReader::open(events)
        .with_context(|| format!("failed to open events {}", events.display()))?;

    if threads == 1 {
        for event in reader {
            analyzer.process_event(&event?);
        }
    } else {
        let all: Vec<Event> = reader.collect::<tr_core::Result<_>>()?;
        analyzer.process_parallel(&all, threads)?;
    }

    let stats = analyzer.lumi_stats();
    tracing::info!(
        events = analyzer.n_events(),
        admitted = stats.admitted,
        lumi_lookups = stats.lookups,
        lumi_hit_rate = stats.hit_rate(),
        "event loop done"
    );

    let summary = analyzer.finish();
    print_report(&summary);

    if let Some(path) = output {
        let artifact = RatesArtifact::from_summary(&summary);
        std::fs::write(path, artifact.to_json_pretty()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "rates artifact written");
    }
    Ok(())
}

fn print_report(summary: &RatesSummary) {
    println!(
        "{}: {} events, {} admitted",
        summary.trigger_name, summary.n_events, summary.n_admitted
    );
    println!("  thresholds:");
    for line in tr_rates::report::threshold_report(summary).lines() {
        println!("    {line}");
    }
}
