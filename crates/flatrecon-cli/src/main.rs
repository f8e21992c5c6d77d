//! flatrecon CLI - reconcile flat files against database extracts.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse { file, layout, json } => commands::parse::run(file, layout, json, cli.verbose),

        Commands::Reconcile {
            file,
            layout,
            db,
            config,
            record_type,
            key,
            threshold,
            report_unmatched_db,
            match_by_name,
            lookup,
            file_name_lookup,
            output,
        } => commands::reconcile::run(
            commands::reconcile::ReconcileArgs {
                file,
                layout,
                db,
                config,
                record_type,
                key,
                threshold,
                report_unmatched_db,
                match_by_name,
                lookup,
                file_name_lookup,
                output,
            },
            cli.verbose,
        ),

        Commands::Show { file, json } => commands::show::run(file, json, cli.verbose),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
