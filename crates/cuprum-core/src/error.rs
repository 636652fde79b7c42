use thiserror::Error;

use crate::domain::SettlementDate;

/// Failure to interpret a calendar date in any accepted input format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unparseable date '{value}', expected YYYY-MM-DD or MM/DD/YYYY")]
pub struct DateParseError {
    pub value: String,
}

/// Coarse error classification surfaced next to messages and mapped to
/// process exit codes by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataFormat,
    Range,
    InsufficientData,
    Io,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataFormat => "data-format",
            Self::Range => "range",
            Self::InsufficientData => "insufficient-data",
            Self::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}, column '{column}': {reason}")]
    DataFormat {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: SettlementDate,
        end: SettlementDate,
    },

    #[error("no records between {start} and {end}")]
    EmptyRange {
        start: SettlementDate,
        end: SettlementDate,
    },

    #[error("insufficient data: {months} calendar month(s) in range, need at least {required}")]
    InsufficientData { months: usize, required: usize },

    #[error("cannot open input '{path}': {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("report serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Classification used for exit codes and operator-facing messages.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumn { .. } | Self::DataFormat { .. } | Self::Csv(_) => {
                ErrorKind::DataFormat
            }
            Self::InvalidRange { .. } | Self::EmptyRange { .. } => ErrorKind::Range,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::Input { .. } | Self::Output { .. } | Self::Io(_) | Self::Serialization(_) => {
                ErrorKind::Io
            }
        }
    }
}
