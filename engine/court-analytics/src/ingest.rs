//! Row validation at the ingestion boundary
//!
//! Provider rows are converted one by one into typed records. A row that
//! cannot be converted yields a [`SkipReason`]; the batch keeps going and
//! the skipped rows end up in an [`IngestReport`] next to the accepted ones.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Why a provider row was not turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SkipReason {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value {value:?} for field `{field}`")]
    InvalidValue { field: &'static str, value: String },
}

/// Shorthand for "this field must be present"
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, SkipReason> {
    value.ok_or(SkipReason::MissingField(field))
}

/// Like [`require`] for text fields: blank strings count as missing
pub fn require_text(value: Option<String>, field: &'static str) -> Result<String, SkipReason> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SkipReason::MissingField(field)),
    }
}

/// A row that was skipped, with enough context to find it again
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Where the row came from, e.g. `E2024 game 12`
    pub source: String,
    /// Position of the row inside its source payload
    pub index: usize,
    pub reason: SkipReason,
}

/// Accepted records plus the rows that were skipped on the way in
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport<T> {
    pub accepted: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for IngestReport<T> {
    fn default() -> Self {
        Self { accepted: Vec::new(), skipped: Vec::new() }
    }
}

impl<T> IngestReport<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect per-row results coming from one source payload
    pub fn collect<I>(source: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = Result<T, SkipReason>>,
    {
        let mut report = Self::new();
        report.extend(source, rows);
        report
    }

    /// Append per-row results coming from one source payload
    pub fn extend<I>(&mut self, source: &str, rows: I)
    where
        I: IntoIterator<Item = Result<T, SkipReason>>,
    {
        for (index, row) in rows.into_iter().enumerate() {
            match row {
                Ok(record) => self.accepted.push(record),
                Err(reason) => {
                    self.skipped.push(SkippedRow { source: source.to_string(), index, reason })
                }
            }
        }
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: IngestReport<T>) {
        self.accepted.extend(other.accepted);
        self.skipped.extend(other.skipped);
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Warn about skipped rows. Only the first few are listed individually.
    pub fn log_skipped(&self, dataset: &str) {
        if self.skipped.is_empty() {
            return;
        }

        warn!(
            "Skipped {} of {} {} rows during ingestion",
            self.skipped.len(),
            self.skipped.len() + self.accepted.len(),
            dataset
        );
        for row in self.skipped.iter().take(5) {
            warn!("  {} row {}: {}", row.source, row.index, row.reason);
        }
    }

    /// Drop the skipped rows and keep the records
    pub fn into_accepted(self) -> Vec<T> {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_splits_accepted_and_skipped() {
        let rows = vec![Ok(1), Err(SkipReason::MissingField("ID_PLAYER")), Ok(3)];
        let report = IngestReport::collect("E2024 game 1", rows);

        assert_eq!(report.accepted, vec![1, 3]);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].source, "E2024 game 1");
    }

    #[test]
    fn test_merge_reports() {
        let mut first = IngestReport::collect("a", vec![Ok(1)]);
        let second = IngestReport::collect("b", vec![Err(SkipReason::MissingField("x")), Ok(2)]);
        first.merge(second);

        assert_eq!(first.accepted_count(), 2);
        assert_eq!(first.skipped_count(), 1);
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert_eq!(
            require_text(Some("  ".to_string()), "TEAM"),
            Err(SkipReason::MissingField("TEAM"))
        );
        assert_eq!(require_text(Some("MAD".to_string()), "TEAM").unwrap(), "MAD");
        assert_eq!(require::<i32>(None, "NUM_ANOT"), Err(SkipReason::MissingField("NUM_ANOT")));
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::InvalidValue { field: "Minutes", value: "abc".to_string() };
        assert_eq!(reason.to_string(), "invalid value \"abc\" for field `Minutes`");
    }
}
