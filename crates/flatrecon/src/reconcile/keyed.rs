//! Key-based matching, tolerant of inserted or deleted records.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::input::FileRecord;
use crate::layout::ColumnMap;
use crate::source::DbRecord;

use super::compare::compare_fields;
use super::result::{Comparison, MismatchReason, RecordMismatch};

/// Which fields identify a record on each side.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec<'a> {
    /// File field holding the key.
    pub field: &'a str,
    /// Database column holding the key.
    pub column: &'a str,
}

/// Match file records to database records by key.
///
/// Database rows sharing a key are consumed in input order. File records with
/// an empty key are reported as `MissingKey`; file records without a
/// counterpart as `MissingInDatabase`. Unconsumed database rows are reported
/// as `MissingInFile` only when `report_unmatched_db` is set.
pub fn compare_keyed(
    file: &[FileRecord],
    db: &[DbRecord],
    map: &ColumnMap,
    key: KeySpec<'_>,
    report_unmatched_db: bool,
) -> Comparison {
    let mut lookup: HashMap<String, VecDeque<usize>> = HashMap::with_capacity(db.len());
    for (index, row) in db.iter().enumerate() {
        let value = row.formatted(key.column);
        let value = value.trim();
        if !value.is_empty() {
            lookup.entry(value.to_string()).or_default().push_back(index);
        }
    }

    let mut consumed = vec![false; db.len()];
    let mut comparison = Comparison::default();

    for (index, record) in file.iter().enumerate() {
        let value = record.get(key.field).unwrap_or("").trim();
        if value.is_empty() {
            comparison
                .mismatches
                .push(RecordMismatch::file_only(MismatchReason::MissingKey, index, None, record));
            continue;
        }

        let Some(db_index) = lookup.get_mut(value).and_then(VecDeque::pop_front) else {
            comparison.mismatches.push(RecordMismatch::file_only(
                MismatchReason::MissingInDatabase,
                index,
                Some(value.to_string()),
                record,
            ));
            continue;
        };

        consumed[db_index] = true;
        comparison.compared += 1;

        let row = &db[db_index];
        let fields = compare_fields(record, row, map);
        if fields.is_empty() {
            comparison.matched += 1;
        } else {
            comparison.mismatches.push(RecordMismatch::differing(
                index,
                Some(value.to_string()),
                record,
                row,
                fields,
            ));
        }
    }

    let unmatched_db = consumed.iter().filter(|c| !**c).count();
    if unmatched_db > 0 {
        debug!(unmatched_db, reported = report_unmatched_db, "database rows without file counterpart");
    }

    if report_unmatched_db {
        for (index, row) in db.iter().enumerate().filter(|(i, _)| !consumed[*i]) {
            let value = row.formatted(key.column);
            let value = value.trim();
            let key = (!value.is_empty()).then(|| value.to_string());
            comparison.mismatches.push(RecordMismatch::db_only(index, key, row));
        }
    }

    comparison
}
