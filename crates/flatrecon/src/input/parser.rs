//! Layout-driven flat-file parser.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{ReconError, Result};
use crate::layout::{FieldLayout, FileLayout};

use super::record::FileRecord;
use super::source::{ParsedFile, SourceMetadata};

/// Minimum line count for a file with header and trailer.
const MIN_FRAMED_LINES: usize = 3;

/// Parses fixed-width and delimited files according to a [`FileLayout`].
#[derive(Debug, Clone)]
pub struct FlatFileParser {
    layout: FileLayout,
}

impl FlatFileParser {
    /// Create a parser, validating the layout up front.
    pub fn new(layout: FileLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    /// Parse a file and return the records and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(ParsedFile, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| ReconError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| ReconError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let text = String::from_utf8(contents).map_err(|e| ReconError::Parse {
            line: 0,
            message: format!("file is not valid UTF-8: {}", e.utf8_error()),
        })?;
        let size_bytes = text.len() as u64;

        let parsed = self.parse_str(&text)?;
        debug!(
            path = %path.display(),
            records = parsed.record_count(),
            skipped = parsed.skipped,
            "parsed flat file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            self.layout.format_name().to_string(),
            parsed.line_count,
            parsed.record_count(),
        );

        Ok((parsed, metadata))
    }

    /// Parse in-memory file contents.
    ///
    /// Delimited files ignore blank lines entirely, so a header or trailer is
    /// the first or last non-blank line. Record line numbers stay physical.
    pub fn parse_str(&self, contents: &str) -> Result<ParsedFile> {
        let line_count = contents.lines().count();
        let keep_blank = matches!(self.layout, FileLayout::FixedWidth { .. });
        let lines: Vec<(usize, &str)> = contents
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| keep_blank || !line.trim().is_empty())
            .collect();

        let (header, body, trailer) = if self.layout.has_header_trailer() {
            if lines.len() < MIN_FRAMED_LINES {
                return Err(ReconError::Parse {
                    line: line_count,
                    message: format!(
                        "expected header, trailer and at least one record, found {} line(s)",
                        lines.len()
                    ),
                });
            }
            let last = lines.len() - 1;
            (
                Some(lines[0].1.to_string()),
                &lines[1..last],
                Some(lines[last].1.to_string()),
            )
        } else {
            (None, &lines[..], None)
        };

        let mut parsed = ParsedFile {
            header,
            trailer,
            line_count,
            ..ParsedFile::default()
        };

        match &self.layout {
            FileLayout::FixedWidth { fields, .. } => {
                parsed.records = body
                    .iter()
                    .map(|(line_no, line)| slice_fixed_width(line, fields, *line_no))
                    .collect();
            }
            FileLayout::Delimited { .. } => {
                self.parse_delimited(body, &mut parsed)?;
            }
        }

        Ok(parsed)
    }

    fn parse_delimited(&self, body: &[(usize, &str)], parsed: &mut ParsedFile) -> Result<()> {
        let FileLayout::Delimited { record_types, .. } = &self.layout else {
            return Ok(());
        };

        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.layout.delimiter_byte()?.unwrap_or(b','))
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'));
        match self.layout.quote_byte()? {
            Some(quote) => builder.quote(quote),
            None => builder.quoting(false),
        };

        let mut tokens = csv::StringRecord::new();
        for &(line_no, line) in body {
            // One reader per line, so an unbalanced quote cannot swallow the next record
            let mut reader = builder.from_reader(line.as_bytes());
            if !reader.read_record(&mut tokens)? {
                continue;
            }

            let record_type = tokens.get(0).unwrap_or("").trim();
            let Some(fields) = record_types.get(record_type) else {
                warn!(line = line_no, record_type, "skipping unrecognized record type");
                parsed.skipped += 1;
                continue;
            };

            if tokens.len() > fields.len() + 1 {
                debug!(
                    line = line_no,
                    extra = tokens.len() - fields.len() - 1,
                    "ignoring extra tokens"
                );
            }

            let mut values = Vec::with_capacity(fields.len());
            for (index, field) in fields.fields().iter().enumerate() {
                let mut value = tokens.get(index + 1).unwrap_or("").trim().to_string();
                if let Some(max) = field.length {
                    if value.chars().count() > max {
                        warn!(
                            line = line_no,
                            field = %field.name,
                            max_length = max,
                            "truncating value exceeding max length"
                        );
                        value = value.chars().take(max).collect();
                        parsed.truncated += 1;
                    }
                }
                values.push((field.name.clone(), value));
            }

            parsed
                .records
                .push(FileRecord::from_pairs(line_no, values).with_record_type(record_type));
        }

        Ok(())
    }
}

/// Slice a line at cumulative character offsets; short lines yield partial values.
fn slice_fixed_width(line: &str, fields: &FieldLayout, line_no: usize) -> FileRecord {
    let mut rest = line;
    let mut values = Vec::with_capacity(fields.len());

    for field in fields.fields() {
        let width = field.length.unwrap_or(0);
        let split = rest
            .char_indices()
            .nth(width)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (value, tail) = rest.split_at(split);
        values.push((field.name.as_str(), value));
        rest = tail;
    }

    FileRecord::from_pairs(line_no, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldSpec;

    fn fixed(fields: &[(&str, usize)]) -> FileLayout {
        FileLayout::fixed_width(
            fields
                .iter()
                .map(|(name, len)| FieldSpec::new(*name).with_length(*len))
                .collect(),
        )
    }

    fn detail_layout() -> FileLayout {
        FileLayout::delimited(',')
            .with_record_type(
                "C",
                vec![FieldSpec::new("id"), FieldSpec::new("name"), FieldSpec::new("amount")]
                    .into_iter()
                    .collect(),
            )
            .with_record_type(
                "D",
                vec![FieldSpec::new("id"), FieldSpec::new("name"), FieldSpec::new("amount")]
                    .into_iter()
                    .collect(),
            )
    }

    #[test]
    fn test_fixed_width_slices_and_trims() {
        let parser = FlatFileParser::new(fixed(&[("id", 5), ("amt", 10)])).unwrap();
        let parsed = parser.parse_str("00123      99.50").unwrap();

        assert_eq!(parsed.record_count(), 1);
        let record = &parsed.records[0];
        assert_eq!(record.get("id"), Some("00123"));
        assert_eq!(record.get("amt"), Some("99.50"));
    }

    #[test]
    fn test_fixed_width_short_line_takes_remainder() {
        let parser = FlatFileParser::new(fixed(&[("id", 5), ("amt", 10), ("flag", 1)])).unwrap();
        let parsed = parser.parse_str("00123  12").unwrap();

        let record = &parsed.records[0];
        assert_eq!(record.get("amt"), Some("12"));
        assert_eq!(record.get("flag"), Some(""));
    }

    #[test]
    fn test_fixed_width_blank_lines_yield_records() {
        let parser = FlatFileParser::new(fixed(&[("id", 3)])).unwrap();
        let parsed = parser.parse_str("001\n\n003\n").unwrap();

        assert_eq!(parsed.record_count(), 3);
        assert_eq!(parsed.records[1].get("id"), Some(""));
        assert_eq!(parsed.records[2].line, 3);
    }

    #[test]
    fn test_fixed_width_multibyte_characters() {
        let parser = FlatFileParser::new(fixed(&[("name", 4), ("code", 2)])).unwrap();
        let parsed = parser.parse_str("Zoë AB").unwrap();
        assert_eq!(parsed.records[0].get("name"), Some("Zoë"));
        assert_eq!(parsed.records[0].get("code"), Some("AB"));
    }

    #[test]
    fn test_delimited_dispatches_on_record_type() {
        let parser = FlatFileParser::new(detail_layout().with_header_trailer(true)).unwrap();
        let parsed = parser
            .parse_str("H,20240101\nC,1,Alice,100.00\nD,2,Bob,50.00\nT,2\n")
            .unwrap();

        assert_eq!(parsed.header.as_deref(), Some("H,20240101"));
        assert_eq!(parsed.trailer.as_deref(), Some("T,2"));
        assert_eq!(parsed.record_count(), 2);
        assert_eq!(parsed.records[0].record_type(), Some("C"));
        assert_eq!(parsed.records[0].get("name"), Some("Alice"));
        assert_eq!(parsed.records[1].record_type(), Some("D"));
        assert_eq!(parsed.records[1].get("amount"), Some("50.00"));
        assert_eq!(parsed.records[1].line, 3);
    }

    #[test]
    fn test_delimited_skips_unknown_types_and_empty_lines() {
        let parser = FlatFileParser::new(detail_layout()).unwrap();
        let parsed = parser.parse_str("C,1,Alice,1\n\nX,9,Nobody,0\nD,2,Bob,2\n").unwrap();

        assert_eq!(parsed.record_count(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[1].line, 4);
    }

    #[test]
    fn test_delimited_preserves_empty_trailing_fields() {
        let parser = FlatFileParser::new(detail_layout()).unwrap();
        let parsed = parser.parse_str("C,1,,\nD,2").unwrap();

        assert_eq!(parsed.records[0].get("name"), Some(""));
        assert_eq!(parsed.records[0].get("amount"), Some(""));
        assert_eq!(parsed.records[1].get("amount"), Some(""));
        assert_eq!(parsed.records[1].len(), 3);
    }

    #[test]
    fn test_delimited_truncates_long_values() {
        let layout = FileLayout::delimited('|').with_record_type(
            "D",
            vec![FieldSpec::new("code").with_length(3)].into_iter().collect(),
        );
        let parser = FlatFileParser::new(layout).unwrap();
        let parsed = parser.parse_str("D|ABCDEF").unwrap();

        assert_eq!(parsed.records[0].get("code"), Some("ABC"));
        assert_eq!(parsed.truncated, 1);
    }

    #[test]
    fn test_delimited_quotes_are_literal() {
        let parser = FlatFileParser::new(detail_layout()).unwrap();
        let parsed = parser.parse_str("C,1,\"Smith,100").unwrap();
        assert_eq!(parsed.records[0].get("name"), Some("\"Smith"));
    }

    #[test]
    fn test_delimited_quote_protects_delimiter() {
        let parser = FlatFileParser::new(detail_layout().with_quote('"')).unwrap();
        let parsed = parser
            .parse_str("C,1,\"Smith, J\",100\nD,2,\"53 Carp Rd, Knowloon City\",7")
            .unwrap();

        assert_eq!(parsed.records[0].get("name"), Some("Smith, J"));
        assert_eq!(parsed.records[0].get("amount"), Some("100"));
        assert_eq!(parsed.records[1].get("name"), Some("53 Carp Rd, Knowloon City"));
        assert_eq!(parsed.records[1].get("amount"), Some("7"));
    }

    #[test]
    fn test_unbalanced_quote_stays_on_its_line() {
        let parser = FlatFileParser::new(detail_layout().with_quote('"')).unwrap();
        let parsed = parser.parse_str("C,1,\"Smith,100\nD,2,Bob,50").unwrap();

        assert_eq!(parsed.record_count(), 2);
        assert_eq!(parsed.records[1].get("name"), Some("Bob"));
        assert_eq!(parsed.records[1].line, 2);
    }

    #[test]
    fn test_trailer_is_last_non_blank_line() {
        let parser = FlatFileParser::new(detail_layout().with_header_trailer(true)).unwrap();
        let parsed = parser.parse_str("H,1\nC,1,Alice,1\nT,1\n\n   \n").unwrap();

        assert_eq!(parsed.trailer.as_deref(), Some("T,1"));
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.record_count(), 1);
        assert_eq!(parsed.line_count, 5);
    }

    #[test]
    fn test_framed_records_keep_physical_line_numbers() {
        let parser = FlatFileParser::new(detail_layout().with_header_trailer(true)).unwrap();
        let parsed = parser.parse_str("\nH,1\n\nC,1,Alice,1\n\nD,2,Bob,2\nT,2").unwrap();

        assert_eq!(parsed.header.as_deref(), Some("H,1"));
        assert_eq!(parsed.records[0].line, 4);
        assert_eq!(parsed.records[1].line, 6);
    }

    #[test]
    fn test_blank_lines_do_not_count_toward_framing() {
        let parser = FlatFileParser::new(detail_layout().with_header_trailer(true)).unwrap();
        let err = parser.parse_str("H,1\n\nT,1\n").unwrap_err();
        assert!(matches!(err, ReconError::Parse { .. }));
    }

    #[test]
    fn test_header_trailer_requires_three_lines() {
        let parser = FlatFileParser::new(detail_layout().with_header_trailer(true)).unwrap();
        let err = parser.parse_str("H\nT\n").unwrap_err();
        assert!(matches!(err, ReconError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_invalid_layout_rejected_at_construction() {
        let layout = FileLayout::fixed_width(vec![FieldSpec::new("id")].into_iter().collect());
        assert!(FlatFileParser::new(layout).is_err());
    }
}
