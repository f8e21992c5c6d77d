//! Whole-file layout definitions.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

use super::field::{ColumnMap, FieldLayout};

/// Declarative description of a flat file.
///
/// Layouts are usually kept next to the test data as JSON:
///
/// ```json
/// {
///   "format": "delimited",
///   "delimiter": ",",
///   "header_trailer": true,
///   "quote": "\"",
///   "record_types": {
///     "C": [{"name": "id", "column": "ID"}, {"name": "name", "length": 20}],
///     "D": [{"name": "id", "column": "ID"}, {"name": "amount"}]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FileLayout {
    /// Fields are sliced at cumulative offsets.
    FixedWidth {
        fields: FieldLayout,
        #[serde(default)]
        header_trailer: bool,
    },
    /// Fields are split on a delimiter; the first token selects the layout.
    Delimited {
        delimiter: char,
        record_types: IndexMap<String, FieldLayout>,
        #[serde(default)]
        header_trailer: bool,
        /// Quote character protecting delimiters inside a value. Off by default.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quote: Option<char>,
    },
}

impl FileLayout {
    /// Fixed-width layout without header or trailer.
    pub fn fixed_width(fields: FieldLayout) -> Self {
        FileLayout::FixedWidth {
            fields,
            header_trailer: false,
        }
    }

    /// Delimited layout without header or trailer and no record types yet.
    pub fn delimited(delimiter: char) -> Self {
        FileLayout::Delimited {
            delimiter,
            record_types: IndexMap::new(),
            header_trailer: false,
            quote: None,
        }
    }

    /// Register the layout used for a record-type discriminator.
    ///
    /// Has no effect on fixed-width layouts.
    pub fn with_record_type(mut self, record_type: impl Into<String>, fields: FieldLayout) -> Self {
        if let FileLayout::Delimited { record_types, .. } = &mut self {
            record_types.insert(record_type.into(), fields);
        }
        self
    }

    /// Treat `quote` as a quote character in delimited files.
    ///
    /// Has no effect on fixed-width layouts.
    pub fn with_quote(mut self, quote: char) -> Self {
        if let FileLayout::Delimited { quote: q, .. } = &mut self {
            *q = Some(quote);
        }
        self
    }

    /// Expect the first and last line to be a header and a trailer.
    pub fn with_header_trailer(mut self, expected: bool) -> Self {
        match &mut self {
            FileLayout::FixedWidth { header_trailer, .. }
            | FileLayout::Delimited { header_trailer, .. } => *header_trailer = expected,
        }
        self
    }

    /// Whether a header and trailer line surround the body.
    pub fn has_header_trailer(&self) -> bool {
        match self {
            FileLayout::FixedWidth { header_trailer, .. }
            | FileLayout::Delimited { header_trailer, .. } => *header_trailer,
        }
    }

    /// Short format name for reporting.
    pub fn format_name(&self) -> &'static str {
        match self {
            FileLayout::FixedWidth { .. } => "fixed_width",
            FileLayout::Delimited { .. } => "delimited",
        }
    }

    /// Field layout for a record type, or the only layout for fixed-width files.
    pub fn field_layout(&self, record_type: Option<&str>) -> Option<&FieldLayout> {
        match (self, record_type) {
            (FileLayout::FixedWidth { fields, .. }, _) => Some(fields),
            (FileLayout::Delimited { record_types, .. }, Some(rt)) => record_types.get(rt),
            (FileLayout::Delimited { record_types, .. }, None) if record_types.len() == 1 => {
                record_types.values().next()
            }
            (FileLayout::Delimited { .. }, None) => None,
        }
    }

    /// Comparison map for a record type (see [`FileLayout::field_layout`]).
    pub fn column_map(&self, record_type: Option<&str>) -> Result<ColumnMap> {
        Ok(self.required_field_layout(record_type)?.column_map())
    }

    /// Comparison map that also pairs unmapped fields with same-named columns.
    ///
    /// See [`FieldLayout::column_map_matching`].
    pub fn column_map_matching<I, S>(&self, record_type: Option<&str>, columns: I) -> Result<ColumnMap>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self
            .required_field_layout(record_type)?
            .column_map_matching(columns))
    }

    fn required_field_layout(&self, record_type: Option<&str>) -> Result<&FieldLayout> {
        self.field_layout(record_type).ok_or_else(|| match record_type {
            Some(rt) => ReconError::Layout(format!("unknown record type '{}'", rt)),
            None => ReconError::Layout(
                "layout has several record types; choose one to compare".to_string(),
            ),
        })
    }

    /// Delimiter as a single byte, validated for use with the CSV reader.
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self {
            FileLayout::FixedWidth { .. } => Ok(None),
            FileLayout::Delimited { delimiter, .. } => {
                if !delimiter.is_ascii() || matches!(delimiter, '\n' | '\r') {
                    return Err(ReconError::InvalidDelimiter(format!("{:?}", delimiter)));
                }
                Ok(Some(*delimiter as u8))
            }
        }
    }

    /// Quote character as a single byte, when quoting is enabled.
    pub fn quote_byte(&self) -> Result<Option<u8>> {
        match self {
            FileLayout::Delimited {
                quote: Some(quote),
                delimiter,
                ..
            } => {
                if !quote.is_ascii() || matches!(quote, '\n' | '\r') || quote == delimiter {
                    return Err(ReconError::InvalidDelimiter(format!("quote {:?}", quote)));
                }
                Ok(Some(*quote as u8))
            }
            _ => Ok(None),
        }
    }

    /// Check the layout is usable before parsing any file.
    pub fn validate(&self) -> Result<()> {
        match self {
            FileLayout::FixedWidth { fields, .. } => fields.validate_fixed_width(),
            FileLayout::Delimited { record_types, .. } => {
                self.delimiter_byte()?;
                self.quote_byte()?;
                if record_types.is_empty() {
                    return Err(ReconError::Layout(
                        "delimited layout declares no record types".to_string(),
                    ));
                }
                for (record_type, fields) in record_types {
                    if record_type.trim().is_empty() {
                        return Err(ReconError::Layout("empty record type".to_string()));
                    }
                    fields.validate().map_err(|e| {
                        ReconError::Layout(format!("record type '{}': {}", record_type, e))
                    })?;
                }
                Ok(())
            }
        }
    }

    /// Load and validate a layout from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReconError::io(path, e))?;
        let layout: FileLayout = serde_json::from_reader(BufReader::new(file))?;
        layout.validate()?;
        Ok(layout)
    }
}
