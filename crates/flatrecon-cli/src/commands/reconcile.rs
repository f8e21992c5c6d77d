//! Reconcile command - compare a flat file with database rows.

use std::path::PathBuf;

use colored::Colorize;
use flatrecon::{
    FileLayout, FlatFileParser, JsonRecordSource, Lookup, MatchStrategy, RecordSource,
    ReconcileConfig, Reconciler, result_path,
};
use tracing::debug;

/// Arguments for the reconcile command.
pub struct ReconcileArgs {
    pub file: PathBuf,
    pub layout: PathBuf,
    pub db: PathBuf,
    pub config: Option<PathBuf>,
    pub record_type: Option<String>,
    pub key: Option<String>,
    pub threshold: Option<f64>,
    pub report_unmatched_db: bool,
    pub match_by_name: bool,
    pub lookup: Option<String>,
    pub file_name_lookup: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn run(args: ReconcileArgs, verbose: bool) -> Result<bool, Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let config = build_config(&args)?;
    let lookup = match (&args.lookup, &args.file_name_lookup) {
        (Some(lookup), _) => Some(lookup.parse::<Lookup>()?),
        (None, Some(column)) => Some(Lookup::from_file_name(column.clone(), &args.file)?),
        (None, None) => None,
    };

    let layout = FileLayout::load(&args.layout)?;
    let parser = FlatFileParser::new(layout.clone())?;

    println!(
        "{} {}",
        "Reconciling".cyan().bold(),
        args.file.display().to_string().white()
    );

    let (parsed, _source) = parser.parse_file(&args.file)?;
    let records = parsed.into_records(args.record_type.as_deref());

    let rows = JsonRecordSource::load(&args.db)?.fetch(lookup.as_ref())?;
    if let Some(lookup) = &lookup {
        println!("Lookup: {}", lookup.to_string().white());
    }
    println!();

    // The first row's columns stand in for the table's columns
    let column_map = match (args.match_by_name, rows.first()) {
        (true, Some(row)) => layout.column_map_matching(
            args.record_type.as_deref(),
            row.columns().map(|(name, _)| name),
        )?,
        _ => layout.column_map(args.record_type.as_deref())?,
    };
    debug!(mapped = column_map.len(), "column map built");

    let reconciler = Reconciler::new(column_map, config)?;
    let result = reconciler.reconcile(&records, &rows);

    super::print_result(&result, verbose);

    let output_path = args.output.unwrap_or_else(|| result_path(&args.file));
    result.save(&output_path)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(result.is_passed())
}

/// Config file values, overridden by any flags given on the command line.
fn build_config(args: &ReconcileArgs) -> Result<ReconcileConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ReconcileConfig::load(path)?,
        None => ReconcileConfig::new(),
    };

    if let Some(key) = &args.key {
        config = config.with_strategy(MatchStrategy::keyed(key.clone()));
    }
    if let Some(rate) = args.threshold {
        config = config.with_threshold(rate);
    }
    if args.report_unmatched_db {
        config = config.with_unmatched_db_reporting(true);
    }

    config.validate()?;
    debug!(
        strategy = config.strategy.label(),
        threshold = ?config.tolerance.threshold(),
        report_unmatched_db = config.report_unmatched_db,
        "effective reconcile config"
    );
    Ok(config)
}
