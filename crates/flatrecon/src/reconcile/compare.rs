//! Field-level comparison shared by both match strategies.

use crate::input::FileRecord;
use crate::layout::ColumnMap;
use crate::source::{DbRecord, DbValue};

use super::result::FieldMismatch;

/// Compare a file value against a database value.
///
/// Null or absent database values format as `""`. An absent file field only
/// matches a null or absent database value. Otherwise both sides are trimmed
/// and compared exactly (case-sensitive).
pub fn values_match(file_value: Option<&str>, db_value: Option<&DbValue>) -> bool {
    let Some(file) = file_value.map(str::trim) else {
        return matches!(db_value, None | Some(DbValue::Null));
    };
    match db_value {
        None | Some(DbValue::Null) => file.is_empty(),
        Some(DbValue::Text(s)) => file == s.trim(),
        Some(other) => file == other.to_string().trim(),
    }
}

/// Compare every mapped field of a record pair, in map order.
pub fn compare_fields(file: &FileRecord, db: &DbRecord, map: &ColumnMap) -> Vec<FieldMismatch> {
    map.iter()
        .filter_map(|mapping| {
            let file_value = file.get(&mapping.field);
            let db_value = db.get(&mapping.column);
            if values_match(file_value, db_value) {
                None
            } else {
                Some(FieldMismatch {
                    field: mapping.field.clone(),
                    column: mapping.column.clone(),
                    file_value: file_value.unwrap_or("").trim().to_string(),
                    db_value: db_value.cloned().unwrap_or(DbValue::Null),
                })
            }
        })
        .collect()
}
