//! CLI argument definitions for cuprum.
//!
//! The binary takes zero or two positional dates: with none it analyzes the
//! full history, with two it restricts the analysis to that inclusive
//! window. A lone start date is a usage error.
//!
//! # Examples
//!
//! ```bash
//! # Analyze the full history
//! cuprum
//!
//! # Analyze one quarter
//! cuprum 2024-01-01 2024-03-31
//!
//! # Custom input and settlement column
//! cuprum --input data/copper.csv --price-column settlement_usd
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Historical analyzer for LME copper settlement prices.
///
/// Reads the daily settlement CSV, scores the pricing-strategy catalog
/// against every calendar month in the selected period, and writes the JSON
/// report consumed by the pricing dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "cuprum",
    author,
    version,
    about = "Copper settlement-price analysis"
)]
pub struct Cli {
    /// Inclusive period start, YYYY-MM-DD. Needs END_DATE as well.
    #[arg(value_name = "START_DATE", requires = "end_date")]
    pub start_date: Option<String>,

    /// Inclusive period end, YYYY-MM-DD.
    #[arg(value_name = "END_DATE")]
    pub end_date: Option<String>,

    /// Input CSV with the historical settlement series.
    #[arg(long, default_value = "data/lme_copper_historical_data.csv")]
    pub input: PathBuf,

    /// Destination for the JSON report.
    #[arg(long, default_value = "output/analysis_results.json")]
    pub output: PathBuf,

    /// Directory receiving timestamped copies of replaced reports.
    #[arg(long, default_value = "output/backups")]
    pub backup_dir: PathBuf,

    /// Header name of the settlement-price column.
    #[arg(long, default_value = "lme_copper_cash_settlement")]
    pub price_column: String,

    /// Suppress the console summary. Errors still go to stderr.
    #[arg(long)]
    pub quiet: bool,
}
