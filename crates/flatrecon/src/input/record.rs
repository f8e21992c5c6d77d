//! Parsed flat-file records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One parsed line of a flat file: field name to trimmed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Discriminator token for delimited files.
    #[serde(rename = "recordType", skip_serializing_if = "Option::is_none", default)]
    pub record_type: Option<String>,
    fields: IndexMap<String, String>,
}

impl FileRecord {
    /// Build a record from `(field, value)` pairs. Values are trimmed.
    pub fn from_pairs<K, V, I>(line: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.as_ref().trim().to_string()))
            .collect();
        Self {
            line,
            record_type: None,
            fields,
        }
    }

    /// Tag the record with its record type.
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Value of a field, if the layout declared it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|s| s.as_str())
    }

    /// Fields in layout order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn record_type(&self) -> Option<&str> {
        self.record_type.as_deref()
    }
}
