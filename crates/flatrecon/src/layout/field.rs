//! Field descriptors and the ordered field-to-column map.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// Describes one field of a flat-file record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name used as the key in parsed records.
    pub name: String,
    /// Slice width for fixed-width files, max length for delimited files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Database column this field is compared against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl FieldSpec {
    /// Create a field without a length or database column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            column: None,
        }
    }

    /// Set the fixed width (or max length for delimited layouts).
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Map this field onto a database column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Ordered list of field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldLayout {
    fields: Vec<FieldSpec>,
}

impl FieldLayout {
    /// Create a layout from fields in declaration order.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sum of all declared lengths.
    pub fn total_width(&self) -> usize {
        self.fields.iter().filter_map(|f| f.length).sum()
    }

    /// Build the comparison map from fields that declare a column.
    pub fn column_map(&self) -> ColumnMap {
        let mut map = ColumnMap::new();
        for field in &self.fields {
            if let Some(column) = &field.column {
                map.push(&field.name, column);
            }
        }
        map
    }

    /// Like [`FieldLayout::column_map`], but a field without a declared column
    /// is also compared when `columns` contains its name.
    pub fn column_map_matching<I, S>(&self, columns: I) -> ColumnMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let available: HashSet<String> = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        let mut map = ColumnMap::new();
        for field in &self.fields {
            match &field.column {
                Some(column) => map.push(&field.name, column),
                None if available.contains(&field.name) => map.push(&field.name, &field.name),
                None => {}
            }
        }
        map
    }

    /// Check that the layout is non-empty and field names are unique.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(ReconError::Layout("layout declares no fields".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(ReconError::Layout("field with empty name".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ReconError::Layout(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
        }

        Ok(())
    }

    /// Additionally require a length on every field.
    pub fn validate_fixed_width(&self) -> Result<()> {
        self.validate()?;
        if let Some(field) = self.fields.iter().find(|f| f.length.is_none()) {
            return Err(ReconError::Layout(format!(
                "fixed-width field '{}' has no length",
                field.name
            )));
        }
        Ok(())
    }
}

impl FromIterator<FieldSpec> for FieldLayout {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A single file-field to database-column pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub field: String,
    pub column: String,
}

/// Explicit ordered list of `(field, column)` pairs.
///
/// Comparison and mismatch reporting follow this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap {
    mappings: Vec<ColumnMapping>,
}

impl ColumnMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping.
    pub fn push(&mut self, field: impl Into<String>, column: impl Into<String>) {
        self.mappings.push(ColumnMapping {
            field: field.into(),
            column: column.into(),
        });
    }

    /// Builder-style variant of [`ColumnMap::push`].
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.push(field, column);
        self
    }

    /// Mappings in comparison order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Database column mapped to a file field.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.field == field)
            .map(|m| m.column.as_str())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.column_for(field).is_some()
    }
}

impl<F: Into<String>, C: Into<String>> FromIterator<(F, C)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (field, column) in iter {
            map.push(field, column);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_map_preserves_declaration_order() {
        let layout = FieldLayout::new(vec![
            FieldSpec::new("zeta").with_column("Z_COL"),
            FieldSpec::new("filler"),
            FieldSpec::new("alpha").with_column("A_COL"),
        ]);

        let map = layout.column_map();
        let fields: Vec<_> = map.iter().map(|m| m.field.as_str()).collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
        assert_eq!(map.column_for("alpha"), Some("A_COL"));
        assert!(!map.contains_field("filler"));
    }

    #[test]
    fn test_column_map_matching_falls_back_to_names() {
        let layout = FieldLayout::new(vec![
            FieldSpec::new("id").with_column("ACCOUNT_ID"),
            FieldSpec::new("balance"),
            FieldSpec::new("filler"),
        ]);

        let map = layout.column_map_matching(["ACCOUNT_ID", "id", "balance"]);
        let pairs: Vec<_> = map.iter().map(|m| (m.field.as_str(), m.column.as_str())).collect();
        assert_eq!(pairs, vec![("id", "ACCOUNT_ID"), ("balance", "balance")]);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let layout = FieldLayout::new(vec![FieldSpec::new("id"), FieldSpec::new("id")]);
        assert!(matches!(layout.validate(), Err(ReconError::Layout(_))));
    }

    #[test]
    fn test_validate_fixed_width_requires_lengths() {
        let layout = FieldLayout::new(vec![
            FieldSpec::new("id").with_length(5),
            FieldSpec::new("amt"),
        ]);
        let err = layout.validate_fixed_width().unwrap_err();
        assert!(err.to_string().contains("amt"));
    }

    #[test]
    fn test_total_width() {
        let layout: FieldLayout = vec![
            FieldSpec::new("id").with_length(5),
            FieldSpec::new("amt").with_length(10),
        ]
        .into_iter()
        .collect();
        assert_eq!(layout.total_width(), 15);
    }

    #[test]
    fn test_deserialize_field_layout() {
        let json = r#"[{"name": "id", "length": 5, "column": "ACCOUNT_ID"}, {"name": "amt", "length": 10}]"#;
        let layout: FieldLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.fields()[0].column.as_deref(), Some("ACCOUNT_ID"));
        assert_eq!(layout.fields()[1].column, None);
    }
}
