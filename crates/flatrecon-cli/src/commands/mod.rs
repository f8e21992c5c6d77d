//! CLI command implementations.
//!
//! Each command returns `Ok(true)` on success and `Ok(false)` when it ran
//! cleanly but the reconciliation it reports did not pass.

pub mod parse;
pub mod reconcile;
pub mod show;

use colored::Colorize;
use flatrecon::{MismatchReason, RecordMismatch, ValidationResult, ValidationStatus};

/// Maximum mismatches listed in human-readable output.
const MISMATCH_PREVIEW: usize = 20;

/// Print a result summary followed by the first few mismatches.
pub(crate) fn print_result(result: &ValidationResult, verbose: bool) {
    let status = match result.status {
        ValidationStatus::Passed => result.status.label().green().bold(),
        ValidationStatus::Failed => result.status.label().red().bold(),
    };
    println!("Status: {}", status);
    println!("Strategy: {}", result.strategy.label());
    println!();

    println!("{}", "Records:".yellow().bold());
    println!("  File:     {}", result.total_file_records.to_string().white());
    println!("  Database: {}", result.total_db_records.to_string().white());
    println!("  Compared: {}", result.records_compared.to_string().white());
    println!("  Matched:  {}", result.records_matched.to_string().green());
    if result.has_count_mismatch() {
        println!(
            "  Count difference: {} ({})",
            format!("{:+}", result.count_difference).red(),
            result.count_message()
        );
    }
    println!();

    println!("{}", "Mismatches:".yellow().bold());
    println!(
        "  Field differences:   {}",
        result.field_mismatch_count().to_string().red()
    );
    println!(
        "  Missing in database: {}",
        result
            .count_by_reason(MismatchReason::MissingInDatabase)
            .to_string()
            .red()
    );
    println!(
        "  Missing key:         {}",
        result.count_by_reason(MismatchReason::MissingKey).to_string().red()
    );
    println!(
        "  Missing in file:     {}",
        result.count_by_reason(MismatchReason::MissingInFile).to_string().red()
    );

    if let (Some(rate), Some(threshold)) = (result.error_rate, result.threshold) {
        println!();
        let rate_text = format!("{:.2}%", rate * 100.0);
        let rate_color = if rate <= threshold {
            rate_text.green()
        } else {
            rate_text.red()
        };
        println!(
            "Error rate: {} (threshold {:.2}%)",
            rate_color,
            threshold * 100.0
        );
    }

    if result.mismatches.is_empty() {
        return;
    }

    println!();
    let limit = if verbose {
        result.mismatches.len()
    } else {
        MISMATCH_PREVIEW.min(result.mismatches.len())
    };
    for mismatch in &result.mismatches[..limit] {
        print_mismatch(mismatch);
    }
    if limit < result.mismatches.len() {
        println!(
            "  ... and {} more (use {} to list all)",
            result.mismatches.len() - limit,
            "--verbose".cyan()
        );
    }
}

fn print_mismatch(mismatch: &RecordMismatch) {
    let location = match (&mismatch.key, mismatch.index) {
        (Some(key), _) => format!("key {}", key),
        (None, Some(index)) => format!("record {}", index),
        (None, None) => String::from("record"),
    };
    let line = mismatch
        .file_record
        .as_ref()
        .map(|r| format!(" (line {})", r.line))
        .unwrap_or_default();

    println!(
        "  {} {}{}",
        format!("[{}]", mismatch.reason.label()).magenta(),
        location.white().bold(),
        line.dimmed()
    );
    for field in &mismatch.fields {
        println!(
            "      {:20} file={:?} db={:?}",
            format!("{} ({})", field.field, field.column),
            field.file_value,
            field.db_value.to_string()
        );
    }
}
