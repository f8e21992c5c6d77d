//! Database-side records and the sources that supply them.
//!
//! The reconciler never talks to a database. Callers fetch rows through a
//! [`RecordSource`] they own (a connection-pool backed query, an exported
//! JSON extract, ...) and hand the rows over as plain values.

mod json;
mod value;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

pub use json::JsonRecordSource;
pub use value::{DATE_FORMAT, DbRecord, DbValue, TIMESTAMP_FORMAT};

/// Selects the rows belonging to one file, e.g. by business date or file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookup {
    pub column: String,
    pub value: String,
}

impl Lookup {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Lookup keyed by the suffix of a file name, e.g. `accounts_20240131.txt`
    /// selects rows whose `column` equals `20240131`.
    pub fn from_file_name(column: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let value = stem.rsplit_once('_').map(|(_, v)| v.trim()).unwrap_or("");
        if value.is_empty() {
            return Err(ReconError::Config(format!(
                "cannot derive a lookup value from '{}'; expected NAME_VALUE.ext",
                path.display()
            )));
        }
        Ok(Lookup::new(column, value))
    }

    /// Whether a row's trimmed column value equals the lookup value.
    pub fn matches(&self, row: &DbRecord) -> bool {
        row.formatted(&self.column).trim() == self.value.trim()
    }
}

impl FromStr for Lookup {
    type Err = ReconError;

    /// Parse `COLUMN=VALUE`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => {
                Ok(Lookup::new(column.trim(), value))
            }
            _ => Err(ReconError::Config(format!(
                "lookup must be COLUMN=VALUE, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// Supplies database rows for reconciliation.
pub trait RecordSource: Send + Sync {
    /// Fetch rows, optionally restricted by a lookup key.
    fn fetch(&self, lookup: Option<&Lookup>) -> Result<Vec<DbRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup() {
        let lookup: Lookup = "BUSINESS_DATE=2024-01-31".parse().unwrap();
        assert_eq!(lookup.column, "BUSINESS_DATE");
        assert_eq!(lookup.value, "2024-01-31");
        assert_eq!(lookup.to_string(), "BUSINESS_DATE=2024-01-31");
    }

    #[test]
    fn test_lookup_from_file_name() {
        let lookup = Lookup::from_file_name("FILE_DATE", "/data/in/accounts_20240131.txt").unwrap();
        assert_eq!(lookup.column, "FILE_DATE");
        assert_eq!(lookup.value, "20240131");

        let lookup = Lookup::from_file_name("FILE_DATE", "eod_accounts_20240131.dat").unwrap();
        assert_eq!(lookup.value, "20240131");

        assert!(Lookup::from_file_name("FILE_DATE", "accounts.txt").is_err());
        assert!(Lookup::from_file_name("FILE_DATE", "accounts_.txt").is_err());
    }

    #[test]
    fn test_parse_lookup_requires_column() {
        assert!("=x".parse::<Lookup>().is_err());
        assert!("nothing".parse::<Lookup>().is_err());
    }
}
