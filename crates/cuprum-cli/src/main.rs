mod cli;
mod error;
mod logging;
mod summary;

use clap::Parser;
use cuprum_core::{
    build_report, load_csv, AnalyzerConfig, ColumnMap, DateRange, ReportStore, SettlementDate,
};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

fn main() {
    logging::init();

    if let Err(error) = run() {
        eprintln!("error[{}]: {error}", error.kind_label());
        std::process::exit(error.exit_code());
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let window = match (&cli.start_date, &cli.end_date) {
        (Some(start), Some(end)) => {
            let start = SettlementDate::parse_iso(start).map_err(|source| CliError::Argument {
                name: "start_date",
                source,
            })?;
            let end = SettlementDate::parse_iso(end).map_err(|source| CliError::Argument {
                name: "end_date",
                source,
            })?;
            Some(DateRange::new(start, end)?)
        }
        _ => None,
    };
    debug!(?window, input = %cli.input.display(), "starting analysis");

    let config = AnalyzerConfig {
        columns: ColumnMap {
            settlement: cli.price_column.clone(),
            ..ColumnMap::default()
        },
        ..AnalyzerConfig::default()
    };

    let loaded = load_csv(&cli.input, &config.columns)?;
    let report = build_report(&loaded, window, &config)?;

    let store = ReportStore::new(&cli.output, &cli.backup_dir);
    let outcome = store.persist(&report)?;

    if !cli.quiet {
        summary::print_summary(&report, &outcome);
    }

    Ok(())
}
