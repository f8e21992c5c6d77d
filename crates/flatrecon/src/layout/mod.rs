//! Declarative flat-file layouts.

mod field;
mod file;

pub use field::{ColumnMap, ColumnMapping, FieldLayout, FieldSpec};
pub use file::FileLayout;
