use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::SeriesError;
use crate::series::fragment::Fragment;
use crate::series::schema;

/// The single reconciled, deduplicated series: one row per distinct
/// timestamp, covering the union of all fragments' timestamps.
///
/// Rows are value vectors aligned with `columns`. The `BTreeMap` key order
/// gives the ascending-by-timestamp presentation for free; the merge itself
/// never depends on it. Provenance is intentionally discarded: the only
/// semantics retained per cell is "the maximum value ever observed for this
/// day across all snapshots".
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSeries {
    columns: Vec<String>,
    rows: BTreeMap<DateTime<Utc>, Vec<f64>>,
}

impl CanonicalSeries {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sample_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending timestamp order.
    pub fn rows(&self) -> impl Iterator<Item = (&DateTime<Utc>, &[f64])> {
        self.rows.iter().map(|(ts, values)| (ts, values.as_slice()))
    }

    pub fn value(&self, timestamp: &DateTime<Utc>, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(timestamp).map(|values| values[index])
    }
}

/// Merge all fragments into the canonical series.
///
/// An explicit fold: every fragment row is visited exactly once, updating a
/// per-timestamp vector of running per-column maxima. Upstream revisions are
/// monotonically non-decreasing corrections of undercounted history, so for
/// any (timestamp, column) pair the largest observed value is the best
/// available estimate. Not last-write-wins: a later snapshot reporting a
/// smaller boundary value never overwrites an earlier, larger one.
///
/// The result is invariant to fragment order and row order, and reconciling
/// the output with itself as a single fragment is the identity.
pub fn reconcile(fragments: &[Fragment]) -> Result<CanonicalSeries, SeriesError> {
    let columns = schema::guard_columns(fragments)?;

    let mut rows: BTreeMap<DateTime<Utc>, Vec<f64>> = BTreeMap::new();
    for fragment in fragments {
        for row in &fragment.rows {
            let mut aligned = Vec::with_capacity(columns.len());
            for column in &columns {
                // Unreachable after the loader's rectangularity check and the
                // schema guard; never silently default a missing cell.
                let Some(value) = row.values.get(column) else {
                    return Err(SeriesError::Integrity(format!(
                        "row {} in {} has no value for column `{column}`",
                        row.timestamp.to_rfc3339(),
                        fragment.source_id
                    )));
                };
                aligned.push(*value);
            }

            match rows.entry(row.timestamp) {
                Entry::Vacant(slot) => {
                    slot.insert(aligned);
                }
                Entry::Occupied(mut slot) => {
                    for (current, observed) in slot.get_mut().iter_mut().zip(aligned) {
                        *current = current.max(observed);
                    }
                }
            }
        }
    }

    Ok(CanonicalSeries { columns, rows })
}
