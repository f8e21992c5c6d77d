//! Flat-file parsing.

mod parser;
mod record;
mod source;

pub use parser::FlatFileParser;
pub use record::FileRecord;
pub use source::{ParsedFile, SourceMetadata};
