pub mod reconcile;
pub mod report;

use anyhow::{Context, Result};
use std::fs;

use crate::series::fragment::{Fragment, parse_fragment};
use crate::series::reconcile::{CanonicalSeries, reconcile};

/// Shared front half of both commands: read and parse every fragment source,
/// then reconcile. Fails fast on the first malformed document.
pub fn load_and_reconcile(csv_paths: &[String], time_column: &str) -> Result<CanonicalSeries> {
    log::info!("read views/clones time series fragments (CSV docs)");
    log::info!("number of csv files provided: {}", csv_paths.len());

    let mut fragments: Vec<Fragment> = Vec::with_capacity(csv_paths.len());
    for path in csv_paths {
        log::info!("attempt to parse {path}");
        let raw =
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        let fragment = parse_fragment(path, &raw, time_column)?;
        log::info!(
            "{path}: {} samples, {} counter columns",
            fragment.sample_count(),
            fragment.columns.len()
        );
        fragments.push(fragment);
    }

    let total: usize = fragments.iter().map(Fragment::sample_count).sum();
    log::info!("total sample count: {total}");
    log::info!("build aggregate, drop duplicate data");

    let series = reconcile(&fragments)?;
    log::info!("aggregated sample count: {}", series.sample_count());
    Ok(series)
}
