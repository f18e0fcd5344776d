use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::commands::load_and_reconcile;
use crate::series::present;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub csv_paths: Vec<String>,
    pub out: Option<PathBuf>,
    pub time_column: String,
}

/// Merge the fragments and emit the canonical series as CSV, either to a
/// file or to stdout. No report machinery involved.
pub fn run(opts: &ReconcileOptions) -> Result<()> {
    let series = load_and_reconcile(&opts.csv_paths, &opts.time_column)?;
    let csv = present::to_csv(&series, &opts.time_column);

    match &opts.out {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote reconciled series to {}", path.display());
        }
        None => {
            print!("{csv}");
        }
    }
    Ok(())
}
