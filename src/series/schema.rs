use std::collections::BTreeSet;

use crate::error::SeriesError;
use crate::series::fragment::Fragment;

/// Verify every fragment's column set is set-equal to the first fragment's.
///
/// Returns the agreed column order (the first fragment's header order), which
/// downstream presentation relies on. Column order across fragments is free
/// to differ; only the set must match. Any mismatch rejects the whole batch —
/// reconciling a subset would report over an inconsistent column layout.
pub fn guard_columns(fragments: &[Fragment]) -> Result<Vec<String>, SeriesError> {
    let Some(first) = fragments.first() else {
        return Err(SeriesError::EmptyInput);
    };

    let expected: BTreeSet<&String> = first.columns.iter().collect();
    for fragment in &fragments[1..] {
        let actual: BTreeSet<&String> = fragment.columns.iter().collect();
        if actual != expected {
            return Err(SeriesError::SchemaMismatch {
                source_id: fragment.source_id.clone(),
                expected: first.columns.clone(),
                actual: fragment.columns.clone(),
            });
        }
    }

    Ok(first.columns.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fragment::parse_fragment;

    fn fragment(source_id: &str, header: &str) -> Fragment {
        let raw = format!("{header}\n");
        parse_fragment(source_id, &raw, "time_iso8601").expect("parse")
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = guard_columns(&[]).unwrap_err();
        assert!(matches!(err, SeriesError::EmptyInput));
    }

    #[test]
    fn identical_column_sets_pass_in_any_order() {
        let fragments = vec![
            fragment("a.csv", "time_iso8601,views_total,clones_total"),
            fragment("b.csv", "clones_total,time_iso8601,views_total"),
        ];
        let columns = guard_columns(&fragments).expect("guard");
        assert_eq!(columns, vec!["views_total", "clones_total"]);
    }

    #[test]
    fn mismatched_column_sets_name_the_offender() {
        let fragments = vec![
            fragment("a.csv", "time_iso8601,views_total"),
            fragment("b.csv", "time_iso8601,clones_total"),
        ];
        let err = guard_columns(&fragments).unwrap_err();
        let SeriesError::SchemaMismatch {
            source_id,
            expected,
            actual,
        } = err
        else {
            panic!("expected SchemaMismatch, got {err}");
        };
        assert_eq!(source_id, "b.csv");
        assert_eq!(expected, vec!["views_total"]);
        assert_eq!(actual, vec!["clones_total"]);
    }
}
