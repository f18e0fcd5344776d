use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::error::SeriesError;

/// One raw, time-bounded snapshot of the counter series as ingested from a
/// single CSV document.
///
/// Rows are rectangular: every row carries a value for every column named in
/// the header. Row order is whatever the source used; the merge treats rows
/// as a set. Duplicate timestamps within one fragment are tolerated and fold
/// under the same max rule as cross-fragment duplicates.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub source_id: String,
    /// Counter columns in header order, timestamp column excluded.
    pub columns: Vec<String>,
    pub rows: Vec<FragmentRow>,
}

#[derive(Debug, Clone)]
pub struct FragmentRow {
    pub timestamp: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

impl Fragment {
    pub fn sample_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse a timestamp cell, normalized to UTC.
///
/// Accepts RFC 3339 (the `time_iso8601` format the traffic snapshots carry)
/// and bare `YYYY-MM-DD` dates, which map to midnight UTC.
fn parse_timestamp_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|f| f.trim().to_string()).collect()
}

/// Parse one raw CSV document into a validated [`Fragment`].
///
/// `time_column` names the header field holding the timestamp. The whole
/// document is rejected on the first malformed cell; no partial ingestion.
pub fn parse_fragment(
    source_id: &str,
    raw: &str,
    time_column: &str,
) -> Result<Fragment, SeriesError> {
    let mut lines = raw.lines().enumerate();

    let Some((_, header_line)) = lines.next() else {
        return Err(SeriesError::parse(source_id, 1, "document is empty"));
    };
    let header = split_fields(header_line);

    let Some(time_index) = header.iter().position(|name| name == time_column) else {
        return Err(SeriesError::parse(
            source_id,
            1,
            format!("header has no `{time_column}` column"),
        ));
    };

    let mut columns = Vec::with_capacity(header.len().saturating_sub(1));
    for (i, name) in header.iter().enumerate() {
        if i == time_index {
            continue;
        }
        if name.is_empty() {
            return Err(SeriesError::parse(source_id, 1, "header has an empty column name"));
        }
        if columns.contains(name) {
            return Err(SeriesError::parse(
                source_id,
                1,
                format!("duplicate column `{name}` in header"),
            ));
        }
        columns.push(name.clone());
    }
    if columns.is_empty() {
        return Err(SeriesError::parse(
            source_id,
            1,
            "header declares no counter columns",
        ));
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line_no = index + 1;
        if line.trim().is_empty() {
            return Err(SeriesError::parse(source_id, line_no, "empty row"));
        }

        let fields = split_fields(line);
        if fields.len() != header.len() {
            return Err(SeriesError::parse(
                source_id,
                line_no,
                format!(
                    "expected {} fields, got {}",
                    header.len(),
                    fields.len()
                ),
            ));
        }

        let Some(timestamp) = parse_timestamp_utc(&fields[time_index]) else {
            return Err(SeriesError::parse(
                source_id,
                line_no,
                format!("unparseable timestamp `{}`", fields[time_index]),
            ));
        };

        let mut values = BTreeMap::new();
        for (i, field) in fields.iter().enumerate() {
            if i == time_index {
                continue;
            }
            let parsed = field.parse::<f64>();
            let value = match parsed {
                Ok(v) if v.is_finite() => v,
                _ => {
                    return Err(SeriesError::parse(
                        source_id,
                        line_no,
                        format!("non-numeric value `{field}` for column `{}`", header[i]),
                    ));
                }
            };
            values.insert(header[i].clone(), value);
        }

        rows.push(FragmentRow { timestamp, values });
    }

    Ok(Fragment {
        source_id: source_id.to_string(),
        columns,
        rows,
    })
}
