//! Index-by-index comparison.

use crate::input::FileRecord;
use crate::layout::ColumnMap;
use crate::source::DbRecord;

use super::compare::compare_fields;
use super::result::{Comparison, RecordMismatch};

/// Compare records pairwise up to the shorter collection's length.
///
/// Records past the overlap are not reported individually; the count
/// difference is carried by the aggregated result.
pub fn compare_positional(file: &[FileRecord], db: &[DbRecord], map: &ColumnMap) -> Comparison {
    let mut comparison = Comparison::default();

    for (index, (file_record, db_record)) in file.iter().zip(db).enumerate() {
        comparison.compared += 1;
        let fields = compare_fields(file_record, db_record, map);
        if fields.is_empty() {
            comparison.matched += 1;
        } else {
            comparison
                .mismatches
                .push(RecordMismatch::differing(index, None, file_record, db_record, fields));
        }
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::MismatchReason;

    fn map() -> ColumnMap {
        ColumnMap::new().with("id", "ID").with("amt", "AMT")
    }

    fn file(rows: &[(&str, &str)]) -> Vec<FileRecord> {
        rows.iter()
            .enumerate()
            .map(|(i, (id, amt))| FileRecord::from_pairs(i + 1, [("id", *id), ("amt", *amt)]))
            .collect()
    }

    fn db(rows: &[(&str, &str)]) -> Vec<DbRecord> {
        rows.iter()
            .map(|(id, amt)| DbRecord::new().with("ID", *id).with("AMT", *amt))
            .collect()
    }

    #[test]
    fn test_all_match() {
        let rows = [("1", "10.00"), ("2", "20.00")];
        let comparison = compare_positional(&file(&rows), &db(&rows), &map());
        assert_eq!(comparison.compared, 2);
        assert_eq!(comparison.matched, 2);
        assert!(comparison.mismatches.is_empty());
    }

    #[test]
    fn test_reports_index_of_mismatch() {
        let comparison = compare_positional(
            &file(&[("1", "10.00"), ("2", "20.00")]),
            &db(&[("1", "10.00"), ("2", "21.00")]),
            &map(),
        );
        assert_eq!(comparison.matched, 1);
        assert_eq!(comparison.mismatches.len(), 1);

        let mismatch = &comparison.mismatches[0];
        assert_eq!(mismatch.reason, MismatchReason::FieldMismatch);
        assert_eq!(mismatch.index, Some(1));
        assert_eq!(mismatch.fields[0].field, "amt");
    }

    #[test]
    fn test_compares_only_overlap() {
        let comparison = compare_positional(
            &file(&[("1", "a"), ("2", "b"), ("3", "c")]),
            &db(&[("1", "a")]),
            &map(),
        );
        assert_eq!(comparison.compared, 1);
        assert!(comparison.mismatches.is_empty());
    }
}
