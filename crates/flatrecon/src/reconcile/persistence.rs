//! Persistence for validation results - save/load JSON files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::{ReconError, Result};

use super::result::ValidationResult;

impl ValidationResult {
    /// Save the result as pretty-printed JSON.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use flatrecon::ValidationResult;
    /// # fn example(result: &ValidationResult) -> flatrecon::Result<()> {
    /// result.save("reports/accounts.result.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ReconError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            ReconError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            ReconError::Persistence(format!("Failed to serialize validation result: {}", e))
        })?;

        Ok(())
    }

    /// Load a result saved with [`ValidationResult::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            ReconError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ReconError::Persistence(format!(
                "Failed to parse validation result '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Default result path for a flat file.
///
/// # Example
///
/// ```
/// use flatrecon::result_path;
///
/// let path = result_path("data/accounts.dat");
/// assert_eq!(path.to_string_lossy(), "data/accounts.result.json");
/// ```
pub fn result_path(data_path: impl AsRef<Path>) -> PathBuf {
    let path = data_path.as_ref();
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{}.result.json", stem))
}
