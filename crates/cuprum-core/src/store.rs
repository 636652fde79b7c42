//! Report persistence with backup-before-overwrite.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

use crate::error::AnalysisError;
use crate::report::AnalysisReport;

/// Writes reports to a fixed output path. Before each overwrite the previous
/// report is copied into the backup directory under a timestamped name, and
/// the new content goes through a sibling temp file plus rename so a failed
/// write never destroys the existing report.
#[derive(Debug, Clone)]
pub struct ReportStore {
    output_path: PathBuf,
    backup_dir: PathBuf,
}

/// Where a persisted report and its predecessor's backup ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub output_path: PathBuf,
    /// `None` on the first write, when there was nothing to back up.
    pub backup_path: Option<PathBuf>,
}

impl ReportStore {
    pub fn new(output_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn persist(&self, report: &AnalysisReport) -> Result<PersistOutcome, AnalysisError> {
        let payload = serde_json::to_vec_pretty(report)?;

        let parent = self
            .output_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent).map_err(|source| AnalysisError::Output {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let backup_path = if self.output_path.exists() {
            Some(self.back_up_previous()?)
        } else {
            None
        };

        let temp_dir = parent.unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(temp_dir).map_err(|source| AnalysisError::Output {
            path: temp_dir.display().to_string(),
            source,
        })?;
        temp.write_all(&payload)
            .map_err(|source| AnalysisError::Output {
                path: self.output_path.display().to_string(),
                source,
            })?;
        temp.persist(&self.output_path)
            .map_err(|error| AnalysisError::Output {
                path: self.output_path.display().to_string(),
                source: error.error,
            })?;

        info!(
            output = %self.output_path.display(),
            backup = ?backup_path,
            "report persisted"
        );
        Ok(PersistOutcome {
            output_path: self.output_path.clone(),
            backup_path,
        })
    }

    fn back_up_previous(&self) -> Result<PathBuf, AnalysisError> {
        fs::create_dir_all(&self.backup_dir).map_err(|source| AnalysisError::Output {
            path: self.backup_dir.display().to_string(),
            source,
        })?;
        let backup = self.backup_dir.join(self.backup_file_name());
        fs::copy(&self.output_path, &backup).map_err(|source| AnalysisError::Output {
            path: backup.display().to_string(),
            source,
        })?;
        Ok(backup)
    }

    /// `<output stem>_<YYYYMMDD_HHMMSS>.json`, matching what the dashboard's
    /// retention script expects.
    fn backup_file_name(&self) -> String {
        let stem = self
            .output_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("analysis_results");
        let stamp = OffsetDateTime::now_utc()
            .format(format_description!(
                "[year][month][day]_[hour][minute][second]"
            ))
            .expect("backup timestamp must be formattable");
        format!("{stem}_{stamp}.json")
    }
}
