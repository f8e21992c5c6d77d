//! The reconciler entry point.

use tracing::{debug, info};

use crate::error::{ReconError, Result};
use crate::input::FileRecord;
use crate::layout::ColumnMap;
use crate::source::{DbRecord, Lookup, RecordSource};

use super::config::{MatchStrategy, ReconcileConfig};
use super::keyed::{KeySpec, compare_keyed};
use super::positional::compare_positional;
use super::result::ValidationResult;

/// Compares file records against database records.
///
/// A reconciler holds only immutable configuration and can be shared across
/// threads. Each call to [`Reconciler::reconcile`] is independent.
///
/// # Example
///
/// ```
/// use flatrecon::{ColumnMap, DbRecord, FileRecord, ReconcileConfig, Reconciler};
///
/// let map = ColumnMap::new().with("id", "ID");
/// let reconciler = Reconciler::new(map, ReconcileConfig::default()).unwrap();
///
/// let file = vec![FileRecord::from_pairs(1, [("id", "00123")])];
/// let db = vec![DbRecord::new().with("ID", "00123")];
///
/// let result = reconciler.reconcile(&file, &db);
/// assert!(result.is_passed());
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler {
    map: ColumnMap,
    config: ReconcileConfig,
    /// Database column for the key field, resolved at construction.
    key_column: Option<String>,
}

impl Reconciler {
    /// Create a reconciler after validating the configuration against the map.
    pub fn new(map: ColumnMap, config: ReconcileConfig) -> Result<Self> {
        config.validate()?;
        if map.is_empty() {
            return Err(ReconError::Config(
                "no fields are mapped to database columns".to_string(),
            ));
        }

        let key_column = match &config.strategy {
            MatchStrategy::Positional => None,
            MatchStrategy::Keyed { key_field } => {
                let column = map.column_for(key_field).ok_or_else(|| {
                    ReconError::Config(format!(
                        "key field '{}' is not mapped to a database column",
                        key_field
                    ))
                })?;
                Some(column.to_string())
            }
        };

        Ok(Self {
            map,
            config,
            key_column,
        })
    }

    pub fn column_map(&self) -> &ColumnMap {
        &self.map
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile two record collections.
    pub fn reconcile(&self, file: &[FileRecord], db: &[DbRecord]) -> ValidationResult {
        debug!(
            strategy = self.config.strategy.label(),
            file_records = file.len(),
            db_records = db.len(),
            "reconciling"
        );

        let comparison = match (&self.config.strategy, &self.key_column) {
            (MatchStrategy::Keyed { key_field }, Some(key_column)) => compare_keyed(
                file,
                db,
                &self.map,
                KeySpec {
                    field: key_field,
                    column: key_column,
                },
                self.config.report_unmatched_db,
            ),
            _ => compare_positional(file, db, &self.map),
        };

        let result = ValidationResult::assemble(
            self.config.strategy.clone(),
            self.config.tolerance,
            file.len(),
            db.len(),
            comparison,
        );

        info!(
            status = result.status.label(),
            compared = result.records_compared,
            matched = result.records_matched,
            mismatches = result.mismatches.len(),
            "reconciliation finished"
        );

        result
    }

    /// Fetch database rows from a source, then reconcile.
    pub fn reconcile_with_source(
        &self,
        file: &[FileRecord],
        source: &dyn RecordSource,
        lookup: Option<&Lookup>,
    ) -> Result<ValidationResult> {
        let rows = source.fetch(lookup)?;
        Ok(self.reconcile(file, &rows))
    }
}
