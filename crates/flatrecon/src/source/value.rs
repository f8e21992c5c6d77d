//! Database values and rows.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ReconError, Result};

/// Date format used when comparing date columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Timestamp format used when comparing timestamp columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A scalar value read from a database column.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl DbValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DbValue::Null)
    }

    /// Convert a JSON scalar. Arrays and objects are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(DbValue::Null),
            Value::Bool(b) => Ok(DbValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(DbValue::Integer(i)),
                None => n.as_f64().map(DbValue::Float).ok_or_else(|| {
                    ReconError::InvalidInput(format!("number {} is out of range", n))
                }),
            },
            Value::String(s) => Ok(DbValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(ReconError::InvalidInput(format!(
                "expected a scalar column value, found {}",
                value
            ))),
        }
    }
}

/// Comparison form of the value; `Null` formats as an empty string.
impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbValue::Null => Ok(()),
            DbValue::Bool(b) => write!(f, "{}", b),
            DbValue::Integer(i) => write!(f, "{}", i),
            DbValue::Float(x) => write!(f, "{}", x),
            DbValue::Text(s) => f.write_str(s),
            DbValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            DbValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl Serialize for DbValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DbValue::Null => serializer.serialize_none(),
            DbValue::Bool(b) => serializer.serialize_bool(*b),
            DbValue::Integer(i) => serializer.serialize_i64(*i),
            DbValue::Float(x) => serializer.serialize_f64(*x),
            DbValue::Text(s) => serializer.serialize_str(s),
            DbValue::Date(_) | DbValue::Timestamp(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DbValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Bool(bool),
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Option::<Scalar>::deserialize(deserializer)? {
            None => DbValue::Null,
            Some(Scalar::Bool(b)) => DbValue::Bool(b),
            Some(Scalar::Integer(i)) => DbValue::Integer(i),
            Some(Scalar::Float(x)) => DbValue::Float(x),
            Some(Scalar::Text(s)) => DbValue::Text(s),
        })
    }
}

impl From<&str> for DbValue {
    fn from(s: &str) -> Self {
        DbValue::Text(s.to_string())
    }
}

impl From<String> for DbValue {
    fn from(s: String) -> Self {
        DbValue::Text(s)
    }
}

impl From<i64> for DbValue {
    fn from(i: i64) -> Self {
        DbValue::Integer(i)
    }
}

impl From<f64> for DbValue {
    fn from(x: f64) -> Self {
        DbValue::Float(x)
    }
}

impl From<bool> for DbValue {
    fn from(b: bool) -> Self {
        DbValue::Bool(b)
    }
}

impl From<NaiveDate> for DbValue {
    fn from(d: NaiveDate) -> Self {
        DbValue::Date(d)
    }
}

impl From<NaiveDateTime> for DbValue {
    fn from(ts: NaiveDateTime) -> Self {
        DbValue::Timestamp(ts)
    }
}

impl<T: Into<DbValue>> From<Option<T>> for DbValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DbValue::Null)
    }
}

/// One database row: column name to value, in query column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbRecord {
    columns: IndexMap<String, DbValue>,
}

impl DbRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column insertion.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<DbValue>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Build a row from a JSON object of scalars.
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut columns = IndexMap::with_capacity(object.len());
        for (column, value) in object {
            let value = DbValue::from_json(value)
                .map_err(|e| ReconError::InvalidInput(format!("column '{}': {}", column, e)))?;
            columns.insert(column.clone(), value);
        }
        Ok(Self { columns })
    }

    pub fn get(&self, column: &str) -> Option<&DbValue> {
        self.columns.get(column)
    }

    /// Comparison string for a column; absent columns format as empty.
    pub fn formatted(&self, column: &str) -> String {
        self.get(column).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Columns in query order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &DbValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<DbValue>> FromIterator<(K, V)> for DbRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
