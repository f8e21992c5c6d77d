//! Comparison results and their aggregation.

use serde::{Deserialize, Serialize};

use crate::input::FileRecord;
use crate::source::{DbRecord, DbValue};

use super::config::{MatchStrategy, Tolerance};

/// A mapped field whose file and database values differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMismatch {
    /// File field name.
    pub field: String,
    /// Database column it was compared against.
    pub column: String,
    /// Trimmed file value (empty when absent).
    pub file_value: String,
    /// Raw database value (`Null` when absent).
    pub db_value: DbValue,
}

/// Why a record was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchReason {
    /// Both records exist but mapped fields differ.
    FieldMismatch,
    /// File record has no database counterpart.
    MissingInDatabase,
    /// Database record has no file counterpart.
    MissingInFile,
    /// File record has an empty key and cannot be matched.
    MissingKey,
}

impl MismatchReason {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MismatchReason::FieldMismatch => "field mismatch",
            MismatchReason::MissingInDatabase => "missing in database",
            MismatchReason::MissingInFile => "missing in file",
            MismatchReason::MissingKey => "missing key",
        }
    }
}

/// A reported record-level discrepancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMismatch {
    pub reason: MismatchReason,
    /// Record index: file side, or database side for `MissingInFile`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Match key in keyed mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_record: Option<FileRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_record: Option<DbRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMismatch>,
}

impl RecordMismatch {
    /// Record pair with differing fields.
    pub fn differing(
        index: usize,
        key: Option<String>,
        file: &FileRecord,
        db: &DbRecord,
        fields: Vec<FieldMismatch>,
    ) -> Self {
        Self {
            reason: MismatchReason::FieldMismatch,
            index: Some(index),
            key,
            file_record: Some(file.clone()),
            db_record: Some(db.clone()),
            fields,
        }
    }

    /// File record that found no counterpart.
    pub fn file_only(reason: MismatchReason, index: usize, key: Option<String>, file: &FileRecord) -> Self {
        Self {
            reason,
            index: Some(index),
            key,
            file_record: Some(file.clone()),
            db_record: None,
            fields: Vec::new(),
        }
    }

    /// Database record that found no counterpart.
    pub fn db_only(index: usize, key: Option<String>, db: &DbRecord) -> Self {
        Self {
            reason: MismatchReason::MissingInFile,
            index: Some(index),
            key,
            file_record: None,
            db_record: Some(db.clone()),
            fields: Vec::new(),
        }
    }
}

/// Overall outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Passed,
    Failed,
}

impl ValidationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ValidationStatus::Passed => "PASSED",
            ValidationStatus::Failed => "FAILED",
        }
    }
}

/// Raw output of a comparator, before policy is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    /// Record pairs whose fields were compared.
    pub compared: usize,
    /// Compared pairs without field differences.
    pub matched: usize,
    pub mismatches: Vec<RecordMismatch>,
}

/// Aggregate result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub strategy: MatchStrategy,
    pub total_file_records: usize,
    pub total_db_records: usize,
    pub records_compared: usize,
    pub records_matched: usize,
    /// File count minus database count.
    pub count_difference: i64,
    pub count_check: CountCheck,
    pub mismatches: Vec<RecordMismatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub status: ValidationStatus,
}

impl ValidationResult {
    /// Apply the tolerance policy to a comparator's output.
    pub fn assemble(
        strategy: MatchStrategy,
        tolerance: Tolerance,
        total_file_records: usize,
        total_db_records: usize,
        comparison: Comparison,
    ) -> Self {
        let count_check = CountCheck::new(total_file_records, total_db_records);
        let (error_rate, passed) = match tolerance {
            Tolerance::Strict => (
                None,
                comparison.mismatches.is_empty() && count_check.passes(None),
            ),
            Tolerance::Thresholded { rate } => {
                let error_rate = error_rate(total_file_records, comparison.matched);
                (
                    Some(error_rate),
                    error_rate <= rate && count_check.passes(Some(rate)),
                )
            }
        };

        Self {
            strategy,
            total_file_records,
            total_db_records,
            records_compared: comparison.compared,
            records_matched: comparison.matched,
            count_difference: total_file_records as i64 - total_db_records as i64,
            count_check,
            mismatches: comparison.mismatches,
            error_rate,
            threshold: tolerance.threshold(),
            status: if passed {
                ValidationStatus::Passed
            } else {
                ValidationStatus::Failed
            },
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ValidationStatus::Passed
    }

    /// Error rate within threshold (thresholded), or no mismatches (strict).
    pub fn is_within_threshold(&self) -> bool {
        match (self.error_rate, self.threshold) {
            (Some(rate), Some(threshold)) => rate <= threshold,
            _ => self.mismatches.is_empty(),
        }
    }

    /// Whether the file and database produced different record counts.
    pub fn has_count_mismatch(&self) -> bool {
        self.count_difference != 0
    }

    /// Explanation of the record-count outcome, e.g. for reports.
    pub fn count_message(&self) -> String {
        self.count_check.message(self.threshold)
    }

    /// Number of mismatches with the given reason.
    pub fn count_by_reason(&self, reason: MismatchReason) -> usize {
        self.mismatches.iter().filter(|m| m.reason == reason).count()
    }

    pub fn field_mismatch_count(&self) -> usize {
        self.count_by_reason(MismatchReason::FieldMismatch)
    }

    /// Mismatches with the given reason, in report order.
    pub fn mismatches_with(&self, reason: MismatchReason) -> impl Iterator<Item = &RecordMismatch> {
        self.mismatches.iter().filter(move |m| m.reason == reason)
    }
}

/// Share of file records that did not match; 0 for an empty file.
pub fn error_rate(total_file_records: usize, matched: usize) -> f64 {
    if total_file_records == 0 {
        0.0
    } else {
        total_file_records.saturating_sub(matched) as f64 / total_file_records as f64
    }
}

/// Record-count policy for thresholded tolerance.
///
/// More file records than database rows passes while the deficit stays within
/// `threshold`; more database rows than file records always fails.
pub fn record_count_within(total_file_records: usize, total_db_records: usize, threshold: f64) -> bool {
    CountCheck::new(total_file_records, total_db_records).passes(Some(threshold))
}

/// How the file and database record counts compare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CountCheck {
    Equal,
    /// The database lacks `missing` of the file's records.
    FileExceeds { missing: usize, missing_rate: f64 },
    /// The database holds `extra` rows beyond the file's records.
    DbExceeds { extra: usize },
}

impl CountCheck {
    pub fn new(total_file_records: usize, total_db_records: usize) -> Self {
        if total_file_records > total_db_records {
            let missing = total_file_records - total_db_records;
            CountCheck::FileExceeds {
                missing,
                missing_rate: missing as f64 / total_file_records as f64,
            }
        } else if total_db_records > total_file_records {
            CountCheck::DbExceeds {
                extra: total_db_records - total_file_records,
            }
        } else {
            CountCheck::Equal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CountCheck::Equal => "counts match",
            CountCheck::FileExceeds { .. } => "file exceeds database",
            CountCheck::DbExceeds { .. } => "database exceeds file",
        }
    }

    /// Whether the counts pass at `threshold`; `None` means strict.
    pub fn passes(&self, threshold: Option<f64>) -> bool {
        match (self, threshold) {
            (CountCheck::Equal, _) => true,
            (CountCheck::FileExceeds { missing_rate, .. }, Some(threshold)) => *missing_rate <= threshold,
            _ => false,
        }
    }

    /// Human-readable explanation of the outcome.
    pub fn message(&self, threshold: Option<f64>) -> String {
        match (self, threshold) {
            (CountCheck::Equal, _) => "File and database record counts match exactly".to_string(),
            (CountCheck::FileExceeds { missing, missing_rate }, Some(threshold)) => format!(
                "File has {} more records than database ({:.2}% missing, threshold: {:.2}%)",
                missing,
                missing_rate * 100.0,
                threshold * 100.0
            ),
            (CountCheck::FileExceeds { missing, missing_rate }, None) => format!(
                "File has {} more records than database ({:.2}% missing)",
                missing,
                missing_rate * 100.0
            ),
            (CountCheck::DbExceeds { extra }, _) => format!(
                "Database has {} more records than file; this requires investigation",
                extra
            ),
        }
    }
}
