//! adreport — streaming aggregation of ad-campaign event files.
//!
//! Reads a campaign event CSV, groups counters by campaign id, derives CTR
//! and CPA, and writes the top-10 ranking reports.

use adreport_core::AppConfig;
use adreport_engine::Aggregation;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "adreport")]
#[command(about = "Aggregate ad campaign event data and generate top-10 reports")]
#[command(version)]
struct Cli {
    /// Path to the input CSV file
    #[arg(short, long, env = "ADREPORT__INPUT")]
    input: PathBuf,

    /// Directory to write report files (overrides config, default: output)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .init();

    // Apply CLI overrides
    if let Some(output) = cli.output {
        config.output_dir = output.display().to_string();
    }

    // Missing input is a user-facing error; the engine is never invoked.
    if !cli.input.is_file() {
        anyhow::bail!("input file not found: {}", cli.input.display());
    }
    let input_bytes = std::fs::metadata(&cli.input)?.len();
    let input_mb = input_bytes as f64 / (1024.0 * 1024.0);

    info!(
        input = %cli.input.display(),
        size_mb = %format!("{input_mb:.2}"),
        output = %config.output_dir,
        "adreport starting"
    );

    let started = Instant::now();

    info!("[1/3] aggregating events");
    let aggregation = Aggregation::from_csv_path(&cli.input)
        .with_context(|| format!("failed to aggregate {}", cli.input.display()))?;
    info!(campaigns = aggregation.len(), "aggregation complete");

    info!("[2/3] computing metrics");
    let metrics = aggregation.compute_metrics();
    info!(campaigns = metrics.len(), "metrics computed");

    info!("[3/3] writing reports");
    aggregation
        .write_reports(&config.output_dir)
        .with_context(|| format!("failed to write reports to {}", config.output_dir))?;

    let elapsed = started.elapsed().as_secs_f64();
    let throughput = if elapsed > 0.0 { input_mb / elapsed } else { 0.0 };
    match peak_rss_mb() {
        Some(peak) => info!(
            elapsed_s = %format!("{elapsed:.2}"),
            throughput_mb_s = %format!("{throughput:.2}"),
            peak_rss_mb = %format!("{peak:.2}"),
            "done"
        ),
        None => info!(
            elapsed_s = %format!("{elapsed:.2}"),
            throughput_mb_s = %format!("{throughput:.2}"),
            "done"
        ),
    }

    Ok(())
}

/// Peak resident set size in MiB, read from /proc/self/status. Returns
/// `None` on platforms without procfs.
fn peak_rss_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmHWM:"))?;
    let kb: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024.0)
}
