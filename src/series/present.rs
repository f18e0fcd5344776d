use chrono::{DateTime, Utc};

use crate::series::reconcile::CanonicalSeries;

/// Render one numeric cell. Counters are integers in practice; keep them
/// free of a trailing `.0` while still carrying fractional values faithfully.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Per-column `(timestamp, value)` points in ascending timestamp order.
///
/// The iterator borrows the series and can be rebuilt at will, so chart
/// construction may walk the same column repeatedly. `None` when the column
/// is not part of the series.
pub fn column_points<'a>(
    series: &'a CanonicalSeries,
    column: &str,
) -> Option<impl Iterator<Item = (DateTime<Utc>, f64)> + 'a> {
    let index = series.columns().iter().position(|c| c == column)?;
    Some(series.rows().map(move |(ts, values)| (*ts, values[index])))
}

/// The combined tabular view: the full series as CSV with the timestamp
/// column restored in front, rows ascending by timestamp.
pub fn to_csv(series: &CanonicalSeries, time_column: &str) -> String {
    let mut out = String::new();
    out.push_str(time_column);
    for column in series.columns() {
        out.push(',');
        out.push_str(column);
    }
    out.push('\n');

    for (timestamp, values) in series.rows() {
        out.push_str(&timestamp.to_rfc3339());
        for value in values {
            out.push(',');
            out.push_str(&format_value(*value));
        }
        out.push('\n');
    }
    out
}

/// A Markdown table of the most recent `max_rows` days, newest last.
pub fn recent_table(series: &CanonicalSeries, max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str("| day |");
    for column in series.columns() {
        out.push(' ');
        out.push_str(column);
        out.push_str(" |");
    }
    out.push('\n');
    out.push_str("| --- |");
    for _ in series.columns() {
        out.push_str(" --- |");
    }
    out.push('\n');

    let skip = series.sample_count().saturating_sub(max_rows);
    for (timestamp, values) in series.rows().skip(skip) {
        out.push_str(&format!("| {} |", timestamp.format("%Y-%m-%d")));
        for value in values {
            out.push(' ');
            out.push_str(&format_value(*value));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out
}

/// Per-column sums over the whole series, in column order.
pub fn totals(series: &CanonicalSeries) -> Vec<(String, f64)> {
    let mut sums = vec![0.0; series.columns().len()];
    for (_, values) in series.rows() {
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value;
        }
    }
    series.columns().iter().cloned().zip(sums).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fragment::parse_fragment;
    use crate::series::reconcile::reconcile;

    fn series() -> CanonicalSeries {
        let a = parse_fragment(
            "a.csv",
            "time_iso8601,views_total,clones_total\n2020-12-02,25,7\n2020-12-01,10,3\n2020-12-03,40,9\n",
            "time_iso8601",
        )
        .expect("parse");
        reconcile(&[a]).expect("reconcile")
    }

    #[test]
    fn csv_restores_timestamp_column_and_sorts_ascending() {
        let got = to_csv(&series(), "time_iso8601");
        let want = "\
time_iso8601,views_total,clones_total
2020-12-01T00:00:00+00:00,10,3
2020-12-02T00:00:00+00:00,25,7
2020-12-03T00:00:00+00:00,40,9
";
        assert_eq!(got, want);
    }

    #[test]
    fn column_points_are_restartable() {
        let series = series();
        let first: Vec<f64> = column_points(&series, "views_total")
            .expect("column")
            .map(|(_, v)| v)
            .collect();
        let second: Vec<f64> = column_points(&series, "views_total")
            .expect("column")
            .map(|(_, v)| v)
            .collect();
        assert_eq!(first, vec![10.0, 25.0, 40.0]);
        assert_eq!(first, second);
        assert!(column_points(&series, "missing").is_none());
    }

    #[test]
    fn recent_table_keeps_only_the_newest_rows() {
        let got = recent_table(&series(), 2);
        assert!(!got.contains("2020-12-01"));
        assert!(got.contains("| 2020-12-02 | 25 | 7 |"));
        assert!(got.contains("| 2020-12-03 | 40 | 9 |"));
    }

    #[test]
    fn totals_sum_each_column() {
        let got = totals(&series());
        assert_eq!(
            got,
            vec![
                ("views_total".to_string(), 75.0),
                ("clones_total".to_string(), 19.0)
            ]
        );
    }

    #[test]
    fn integral_values_render_without_decimals() {
        assert_eq!(format_value(73.0), "73");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(2.5), "2.5");
    }
}
