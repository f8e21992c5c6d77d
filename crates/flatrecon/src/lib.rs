//! flatrecon: reconcile flat files against database rows.
//!
//! A flat file (fixed-width or delimited with record-type dispatch) is parsed
//! into records according to a declarative layout, then compared field by
//! field with rows fetched from a database. Disagreements are reported as
//! data in a [`ValidationResult`]; only malformed input is an error.
//!
//! # Example
//!
//! ```no_run
//! use flatrecon::{FileLayout, FlatFileParser, JsonRecordSource, MatchStrategy,
//!                 RecordSource, ReconcileConfig, Reconciler};
//!
//! let layout = FileLayout::load("layouts/accounts.json").unwrap();
//! let parser = FlatFileParser::new(layout.clone()).unwrap();
//! let (parsed, _source) = parser.parse_file("accounts.dat").unwrap();
//!
//! let rows = JsonRecordSource::load("accounts.rows.json").unwrap().fetch(None).unwrap();
//!
//! let config = ReconcileConfig::new()
//!     .with_strategy(MatchStrategy::keyed("account_id"))
//!     .with_threshold(0.2);
//! let reconciler = Reconciler::new(layout.column_map(None).unwrap(), config).unwrap();
//!
//! let result = reconciler.reconcile(&parsed.records, &rows);
//! println!("{}: {} mismatches", result.status.label(), result.mismatches.len());
//! ```

pub mod error;
pub mod input;
pub mod layout;
pub mod reconcile;
pub mod source;

pub use error::{ReconError, Result};
pub use input::{FileRecord, FlatFileParser, ParsedFile, SourceMetadata};
pub use layout::{ColumnMap, FieldLayout, FieldSpec, FileLayout};
pub use reconcile::{
    CountCheck, FieldMismatch, MatchStrategy, MismatchReason, RecordMismatch, ReconcileConfig,
    Reconciler, Tolerance, ValidationResult, ValidationStatus, result_path,
};
pub use source::{DbRecord, DbValue, JsonRecordSource, Lookup, RecordSource};
