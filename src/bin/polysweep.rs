//! Runs the bias/variance experiment and reports the results.
//!
//! Usage:
//!   polysweep [--config <json>] [--basis <name>] [--seed <u64>] [--output-dir <dir>] [--report <json>] [--no-plots]
//!
//! Tables are printed to stdout, charts are written to the output directory
//! (`target/plot_output` by default). Set `RUST_LOG=debug` to trace every fit.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use polysweep::{basis::BasisKind, Experiment, SweepConfig};

#[derive(Parser)]
#[command(name = "polysweep")]
#[command(about = "Bias/variance sweeps for polynomial regression on a noisy sine")]
struct Args {
    /// JSON file with experiment settings; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Polynomial basis: `legendre` or `monomial`
    #[arg(short, long)]
    basis: Option<BasisKind>,

    /// Seed for the noise and the split
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory the charts are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write the full report as JSON to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_plots: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = match &args.config {
        Some(path) => SweepConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SweepConfig::default(),
    };
    if let Some(basis) = args.basis {
        config.basis = basis;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let report = Experiment::new(config).run().context("experiment failed")?;
    println!("{report}");

    if !args.no_plots {
        render(&report)?;
    }

    if let Some(path) = args.report {
        report
            .write_json(&path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote report");
    }

    Ok(())
}

#[cfg(feature = "plotting")]
fn render(report: &polysweep::ExperimentReport) -> anyhow::Result<()> {
    let dir = &report.config.output_dir;
    polysweep::plot::render_report(report, dir)
        .with_context(|| format!("failed to render charts into {}", dir.display()))?;
    Ok(())
}

#[cfg(not(feature = "plotting"))]
fn render(_report: &polysweep::ExperimentReport) -> anyhow::Result<()> {
    tracing::warn!("built without the `plotting` feature; no charts written");
    Ok(())
}
