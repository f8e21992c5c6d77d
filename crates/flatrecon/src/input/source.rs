//! Parsed file contents and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::FileRecord;

/// Metadata about the parsed flat file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Layout format (fixed_width, delimited).
    pub format: String,
    /// Number of physical lines, including header and trailer.
    pub line_count: usize,
    /// Number of records produced.
    pub record_count: usize,
    /// When the file was parsed.
    pub parsed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been parsed.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        line_count: usize,
        record_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            line_count,
            record_count,
            parsed_at: Utc::now(),
        }
    }
}

/// Records parsed from a flat file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedFile {
    /// First line, when the layout expects a header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Last line, when the layout expects a trailer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
    /// Records in file order.
    pub records: Vec<FileRecord>,
    /// Physical line count.
    pub line_count: usize,
    /// Lines skipped because of an unrecognized record type.
    pub skipped: usize,
    /// Values truncated to their declared max length.
    pub truncated: usize,
}

impl ParsedFile {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Records tagged with the given record type, in file order.
    pub fn records_of_type<'a>(&'a self, record_type: &'a str) -> impl Iterator<Item = &'a FileRecord> {
        self.records
            .iter()
            .filter(move |r| r.record_type() == Some(record_type))
    }

    /// Owned records, optionally restricted to one record type.
    pub fn into_records(self, record_type: Option<&str>) -> Vec<FileRecord> {
        match record_type {
            Some(rt) => self
                .records
                .into_iter()
                .filter(|r| r.record_type() == Some(rt))
                .collect(),
            None => self.records,
        }
    }
}
