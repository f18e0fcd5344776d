use thiserror::Error;

/// Failure modes of the reconciliation core.
///
/// None of these are recovered locally: each aborts the whole run. A
/// structurally malformed input does not become less malformed on retry, and
/// a partial merge would hand downstream reporting a silently wrong series.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("{source_id}:{line}: {reason}")]
    Parse {
        source_id: String,
        line: usize,
        reason: String,
    },
    #[error("no fragments supplied")]
    EmptyInput,
    #[error(
        "column set mismatch in {source_id}: expected [{}], got [{}]",
        .expected.join(", "),
        .actual.join(", ")
    )]
    SchemaMismatch {
        source_id: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("series integrity violation: {0}")]
    Integrity(String),
}

impl SeriesError {
    pub fn parse(source_id: &str, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            source_id: source_id.to_string(),
            line,
            reason: reason.into(),
        }
    }
}
