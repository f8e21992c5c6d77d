//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flatrecon: reconcile flat files against database extracts
#[derive(Parser)]
#[command(name = "flatrecon")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a flat file and print its records
    Parse {
        /// Path to the flat file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Layout describing the file (JSON)
        #[arg(short, long)]
        layout: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reconcile a flat file against database rows
    Reconcile {
        /// Path to the flat file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Layout describing the file (JSON)
        #[arg(short, long)]
        layout: PathBuf,

        /// Database rows as a JSON array of objects
        #[arg(long)]
        db: PathBuf,

        /// Reconciliation config (JSON); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only reconcile records of this type (delimited layouts)
        #[arg(short = 't', long)]
        record_type: Option<String>,

        /// Match records by this field instead of by position
        #[arg(short, long)]
        key: Option<String>,

        /// Maximum tolerated error rate, between 0 and 1
        #[arg(long)]
        threshold: Option<f64>,

        /// Also report database rows with no matching file record
        #[arg(long)]
        report_unmatched_db: bool,

        /// Compare fields without a declared column against same-named columns
        #[arg(long)]
        match_by_name: bool,

        /// Restrict database rows, e.g. BUSINESS_DATE=2024-01-31
        #[arg(long, value_name = "COLUMN=VALUE", conflicts_with = "file_name_lookup")]
        lookup: Option<String>,

        /// Restrict database rows to COLUMN equal to the file name suffix
        /// (accounts_20240131.txt gives 20240131)
        #[arg(long, value_name = "COLUMN")]
        file_name_lookup: Option<String>,

        /// Output path for the result (default: <file>.result.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a saved reconciliation result
    Show {
        /// Path to result file or data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
