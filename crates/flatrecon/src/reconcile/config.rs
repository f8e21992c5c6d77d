//! Reconciliation configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// How file records are paired with database records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Pair records by index.
    #[default]
    Positional,
    /// Pair records by the value of a key field.
    Keyed { key_field: String },
}

impl MatchStrategy {
    pub fn keyed(key_field: impl Into<String>) -> Self {
        MatchStrategy::Keyed {
            key_field: key_field.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStrategy::Positional => "positional",
            MatchStrategy::Keyed { .. } => "keyed",
        }
    }
}

/// How much disagreement still passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tolerance {
    /// No mismatches and equal record counts.
    #[default]
    Strict,
    /// Error rate and record-count deficit both within `rate` (0.0-1.0).
    Thresholded { rate: f64 },
}

impl Tolerance {
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Tolerance::Strict => None,
            Tolerance::Thresholded { rate } => Some(*rate),
        }
    }
}

/// Configuration for a [`Reconciler`](super::Reconciler).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub tolerance: Tolerance,
    /// Report database rows without a file counterpart (keyed strategy only).
    #[serde(default)]
    pub report_unmatched_db: bool,
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_threshold(self, rate: f64) -> Self {
        self.with_tolerance(Tolerance::Thresholded { rate })
    }

    pub fn with_unmatched_db_reporting(mut self, enabled: bool) -> Self {
        self.report_unmatched_db = enabled;
        self
    }

    /// Check values that deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        if let Tolerance::Thresholded { rate } = self.tolerance {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ReconError::Config(format!(
                    "threshold must be between 0.0 and 1.0, got {}",
                    rate
                )));
            }
        }
        if let MatchStrategy::Keyed { key_field } = &self.strategy {
            if key_field.trim().is_empty() {
                return Err(ReconError::Config("key field must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReconError::io(path, e))?;
        let config: ReconcileConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
