//! Show command - print a saved reconciliation result.

use std::path::PathBuf;

use colored::Colorize;
use flatrecon::{ValidationResult, result_path};

pub fn run(
    file: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    // Accept either the result file itself or the data file it was saved for
    let path = if file.extension().map(|e| e == "json").unwrap_or(false) {
        file.clone()
    } else {
        result_path(&file)
    };

    if !path.exists() {
        return Err(format!(
            "Result file not found: {}\nRun 'flatrecon reconcile {}' first.",
            path.display(),
            file.display()
        )
        .into());
    }

    let result = ValidationResult::load(&path)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} {}",
            "Reconciliation result".cyan().bold(),
            path.display().to_string().white()
        );
        println!();
        super::print_result(&result, verbose);
    }

    Ok(result.is_passed())
}
