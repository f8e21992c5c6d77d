//! Fuzz target for the flat-file parser.
//!
//! Both layout kinds must accept any UTF-8 input without panicking: short
//! lines, multibyte characters and stray delimiters are all data, not errors.

#![no_main]

use flatrecon::{FieldSpec, FileLayout, FlatFileParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let fixed = FileLayout::fixed_width(
        vec![
            FieldSpec::new("id").with_length(5),
            FieldSpec::new("amount").with_length(10),
            FieldSpec::new("flag").with_length(1),
        ]
        .into_iter()
        .collect(),
    );
    if let Ok(parser) = FlatFileParser::new(fixed) {
        let _ = parser.parse_str(content);
    }

    let delimited = FileLayout::delimited(',')
        .with_record_type("C", vec![FieldSpec::new("id").with_length(3)].into_iter().collect())
        .with_record_type("D", vec![FieldSpec::new("id"), FieldSpec::new("v")].into_iter().collect())
        .with_header_trailer(true);
    if let Ok(parser) = FlatFileParser::new(delimited) {
        let _ = parser.parse_str(content);
    }
});
