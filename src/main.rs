mod data;
mod present;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use present::FileExporter;

/// Derive the EV population dashboard views from a registration snapshot.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Snapshot file (.csv, .json, or .parquet).
    input: PathBuf,

    /// Directory the exported views are written to.
    #[arg(short, long, default_value = "dashboard_out")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = data::loader::load_file(&args.input)?;
    if raw.is_empty() {
        bail!("snapshot {} contains no rows", args.input.display());
    }
    info!(
        "loaded {} registrations from {}",
        raw.len(),
        args.input.display()
    );

    let views = report::build_views(&raw);
    info!(
        "{} model years, {} makes, {} registrations inside Washington",
        views.adoption_trend.len(),
        views.make_popularity.len(),
        views.regional.len()
    );

    let mut exporter = FileExporter::new(&args.out_dir)?;
    report::present(&views, &mut exporter)
}
