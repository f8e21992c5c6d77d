//! Parse command - parse a flat file and print its records.

use std::path::PathBuf;

use colored::Colorize;
use flatrecon::{FileLayout, FlatFileParser};

pub fn run(
    file: PathBuf,
    layout: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let layout = FileLayout::load(&layout)?;
    let parser = FlatFileParser::new(layout)?;
    let (parsed, source) = parser.parse_file(&file)?;

    if json_output {
        let output = serde_json::json!({
            "source": source,
            "header": parsed.header,
            "trailer": parsed.trailer,
            "records": parsed.records,
            "skipped": parsed.skipped,
            "truncated": parsed.truncated,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(true);
    }

    println!(
        "{} {} ({})",
        "Parsed".cyan().bold(),
        source.file.white(),
        source.format
    );
    if verbose {
        println!("  Hash: {}", source.hash.dimmed());
        println!("  Size: {} bytes", source.size_bytes);
    }
    println!();

    if let Some(header) = &parsed.header {
        println!("{} {}", "Header: ".yellow().bold(), header);
    }

    for record in &parsed.records {
        let record_type = record
            .record_type()
            .map(|rt| format!("[{}] ", rt))
            .unwrap_or_default();
        let fields: Vec<String> = record
            .fields()
            .map(|(name, value)| format!("{}={}", name.cyan(), value))
            .collect();
        println!(
            "{:>6}  {}{}",
            record.line.to_string().dimmed(),
            record_type.magenta(),
            fields.join("  ")
        );
    }

    if let Some(trailer) = &parsed.trailer {
        println!("{} {}", "Trailer:".yellow().bold(), trailer);
    }

    println!();
    println!(
        "{} records from {} lines",
        parsed.record_count().to_string().white().bold(),
        parsed.line_count
    );
    if parsed.skipped > 0 {
        println!(
            "{} lines skipped (unknown record type)",
            parsed.skipped.to_string().yellow()
        );
    }
    if parsed.truncated > 0 {
        println!(
            "{} values truncated to their declared length",
            parsed.truncated.to_string().yellow()
        );
    }

    Ok(true)
}
