//! Property-based tests for the reconciler and parser.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p flatrecon --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p flatrecon --test property_tests
//! ```

use proptest::prelude::*;

use flatrecon::reconcile::values_match;
use flatrecon::{
    ColumnMap, DbRecord, DbValue, FieldSpec, FileLayout, FileRecord, FlatFileParser,
    MatchStrategy, MismatchReason, ReconcileConfig, Reconciler,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Short values drawn from a small alphabet so matches actually happen.
fn cell() -> impl Strategy<Value = String> {
    "[AB ]{0,3}"
}

/// Rows of (key, amount) pairs.
fn rows(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-e]{0,1}", cell()), 0..max)
}

fn file_records(rows: &[(String, String)]) -> Vec<FileRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, (key, amt))| FileRecord::from_pairs(i + 1, [("key", key.as_str()), ("amt", amt.as_str())]))
        .collect()
}

fn db_records(rows: &[(String, String)]) -> Vec<DbRecord> {
    rows.iter()
        .map(|(key, amt)| {
            let amt = if amt.is_empty() {
                DbValue::Null
            } else {
                DbValue::from(amt.as_str())
            };
            DbRecord::new().with("KEY", key.as_str()).with("AMT", amt)
        })
        .collect()
}

fn map() -> ColumnMap {
    ColumnMap::new().with("key", "KEY").with("amt", "AMT")
}

// =============================================================================
// Reconciler Properties
// =============================================================================

proptest! {
    /// Positional mode compares exactly the overlap.
    #[test]
    fn positional_compares_overlap(file in rows(20), db in rows(20)) {
        let reconciler = Reconciler::new(map(), ReconcileConfig::default()).unwrap();
        let result = reconciler.reconcile(&file_records(&file), &db_records(&db));

        prop_assert_eq!(result.records_compared, file.len().min(db.len()));
    }

    /// Matched plus field mismatches always accounts for every compared pair.
    #[test]
    fn matched_plus_mismatched_is_compared(file in rows(20), db in rows(20), keyed in any::<bool>()) {
        let config = if keyed {
            ReconcileConfig::new().with_strategy(MatchStrategy::keyed("key"))
        } else {
            ReconcileConfig::new()
        };
        let reconciler = Reconciler::new(map(), config).unwrap();
        let result = reconciler.reconcile(&file_records(&file), &db_records(&db));

        prop_assert_eq!(
            result.records_matched + result.field_mismatch_count(),
            result.records_compared
        );
    }

    /// Reconciling twice yields identical results.
    #[test]
    fn reconciliation_is_deterministic(file in rows(20), db in rows(20), threshold in 0.0f64..=1.0) {
        let config = ReconcileConfig::new()
            .with_strategy(MatchStrategy::keyed("key"))
            .with_threshold(threshold)
            .with_unmatched_db_reporting(true);
        let reconciler = Reconciler::new(map(), config).unwrap();
        let file = file_records(&file);
        let db = db_records(&db);

        prop_assert_eq!(reconciler.reconcile(&file, &db), reconciler.reconcile(&file, &db));
    }

    /// Every reported field is part of the column map.
    #[test]
    fn mismatched_fields_are_mapped(file in rows(20), db in rows(20)) {
        let map = map();
        let reconciler = Reconciler::new(map.clone(), ReconcileConfig::default()).unwrap();
        let result = reconciler.reconcile(&file_records(&file), &db_records(&db));

        for mismatch in &result.mismatches {
            for field in &mismatch.fields {
                prop_assert!(map.contains_field(&field.field));
            }
        }
    }

    /// Keyed mode accounts for every file record exactly once.
    #[test]
    fn keyed_accounts_for_every_file_record(file in rows(20), db in rows(20)) {
        let config = ReconcileConfig::new().with_strategy(MatchStrategy::keyed("key"));
        let reconciler = Reconciler::new(map(), config).unwrap();
        let result = reconciler.reconcile(&file_records(&file), &db_records(&db));

        let unpaired = result.count_by_reason(MismatchReason::MissingInDatabase)
            + result.count_by_reason(MismatchReason::MissingKey);
        prop_assert_eq!(result.records_compared + unpaired, file.len());
        prop_assert_eq!(result.count_by_reason(MismatchReason::MissingInFile), 0);
    }

    /// Surrounding whitespace never causes a mismatch.
    #[test]
    fn trimming_never_matters(value in "[A-Za-z0-9]{0,10}", left in " {0,3}", right in "[ \t]{0,3}") {
        let padded = format!("{}{}{}", left, value, right);
        prop_assert!(values_match(Some(&padded), Some(&DbValue::from(value.as_str()))));
        prop_assert!(values_match(Some(&value), Some(&DbValue::from(padded.as_str()))));
    }

    /// Error rate stays within [0, 1].
    #[test]
    fn error_rate_is_a_fraction(file in rows(20), db in rows(20)) {
        let config = ReconcileConfig::new()
            .with_strategy(MatchStrategy::keyed("key"))
            .with_threshold(0.2);
        let reconciler = Reconciler::new(map(), config).unwrap();
        let result = reconciler.reconcile(&file_records(&file), &db_records(&db));

        let rate = result.error_rate.unwrap();
        prop_assert!((0.0..=1.0).contains(&rate));
    }
}

// =============================================================================
// Parser Properties
// =============================================================================

proptest! {
    /// Fixed-width parsing yields one record per line and never panics.
    #[test]
    fn fixed_width_one_record_per_line(lines in prop::collection::vec("[^\r\n]{0,40}", 0..20)) {
        let layout = FileLayout::fixed_width(
            vec![
                FieldSpec::new("a").with_length(3),
                FieldSpec::new("b").with_length(7),
                FieldSpec::new("c").with_length(20),
            ]
            .into_iter()
            .collect(),
        );
        let parser = FlatFileParser::new(layout).unwrap();
        let parsed = parser.parse_str(&lines.join("\n")).unwrap();

        let expected = lines.join("\n").lines().count();
        prop_assert_eq!(parsed.record_count(), expected);
    }

    /// Delimited parsing never panics and never produces more records than lines.
    #[test]
    fn delimited_never_panics(content in "[CDX,\\n a-z0-9]{0,200}") {
        let layout = FileLayout::delimited(',')
            .with_record_type("C", vec![FieldSpec::new("id").with_length(2)].into_iter().collect())
            .with_record_type("D", vec![FieldSpec::new("id"), FieldSpec::new("v")].into_iter().collect());
        let parser = FlatFileParser::new(layout).unwrap();
        let parsed = parser.parse_str(&content).unwrap();

        prop_assert!(parsed.record_count() + parsed.skipped <= content.lines().count());
    }
}
