//! Record reconciliation between flat files and database rows.
//!
//! One [`Reconciler`] covers every combination of match strategy and
//! tolerance:
//!
//! | Strategy | Pairs records by | Reports |
//! |----------|------------------|---------|
//! | positional | index, up to the shorter side | field mismatches |
//! | keyed | key field value | field mismatches, missing in database, missing key, optionally missing in file |
//!
//! With strict tolerance a run passes only when nothing was reported and the
//! record counts are equal. With a threshold it passes when the error rate and
//! the file-over-database record deficit both stay within the rate.

mod compare;
mod config;
mod keyed;
mod persistence;
mod positional;
mod reconciler;
mod result;

pub use compare::{compare_fields, values_match};
pub use config::{MatchStrategy, ReconcileConfig, Tolerance};
pub use keyed::{KeySpec, compare_keyed};
pub use persistence::result_path;
pub use positional::compare_positional;
pub use reconciler::Reconciler;
pub use result::{
    Comparison, CountCheck, FieldMismatch, MismatchReason, RecordMismatch, ValidationResult,
    ValidationStatus, error_rate, record_count_within,
};
