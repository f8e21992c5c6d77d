//! Record source backed by a JSON array of row objects.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::error::{ReconError, Result};

use super::value::DbRecord;
use super::{Lookup, RecordSource};

/// Rows captured as JSON, e.g. an exported query result.
#[derive(Debug, Clone, Default)]
pub struct JsonRecordSource {
    rows: Vec<DbRecord>,
}

impl JsonRecordSource {
    /// Wrap rows that are already in memory.
    pub fn new(rows: Vec<DbRecord>) -> Self {
        Self { rows }
    }

    /// Build from a JSON value that must be an array of objects.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(ReconError::InvalidInput(format!(
                "expected an array of row objects, found {}",
                json_kind(value)
            )));
        };

        let rows = items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(object) => DbRecord::from_json_object(object)
                    .map_err(|e| ReconError::InvalidInput(format!("row {}: {}", index, e))),
                other => Err(ReconError::InvalidInput(format!(
                    "row {} is {}, expected an object",
                    index,
                    json_kind(other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Parse rows from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load rows from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReconError::io(path, e))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        Self::from_value(&value)
    }

    pub fn rows(&self) -> &[DbRecord] {
        &self.rows
    }
}

impl RecordSource for JsonRecordSource {
    fn fetch(&self, lookup: Option<&Lookup>) -> Result<Vec<DbRecord>> {
        Ok(match lookup {
            Some(lookup) => self
                .rows
                .iter()
                .filter(|row| lookup.matches(row))
                .cloned()
                .collect(),
            None => self.rows.clone(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
