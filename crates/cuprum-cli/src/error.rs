use cuprum_core::{AnalysisError, DateParseError, ErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("invalid {name}: {source}")]
    Argument {
        name: &'static str,
        source: DateParseError,
    },
}

impl CliError {
    /// Label printed next to the message so callers can grep by category.
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Analysis(error) => error.kind().as_str(),
            Self::Argument { .. } => "usage",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Analysis(error) => match error.kind() {
                ErrorKind::Range => 2,
                ErrorKind::DataFormat => 3,
                ErrorKind::InsufficientData => 4,
                ErrorKind::Io => 10,
            },
            Self::Argument { .. } => 2,
        }
    }
}
