use crate::log_info;
use crate::modules::data_import::domain::ErrorLedger;
use crate::shared::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Persists the per-line error report of a run under the storage directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    storage_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// Relative report paths live under the storage directory
    pub fn resolve(&self, report_path: &str) -> PathBuf {
        let path = Path::new(report_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.storage_dir.join(path)
        }
    }

    /// Write the ledger, replacing any previous report. Empty ledgers write nothing.
    pub async fn write(
        &self,
        report_path: &str,
        ledger: &ErrorLedger,
    ) -> AppResult<Option<PathBuf>> {
        if ledger.is_empty() {
            return Ok(None);
        }

        let target = self.resolve(report_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::StorageError(format!(
                    "Failed to create report directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        tokio::fs::write(&target, ledger.render()).await.map_err(|e| {
            AppError::StorageError(format!("Failed to write report {}: {}", target.display(), e))
        })?;

        log_info!(
            "Error report with {} lines written to {}",
            ledger.len(),
            target.display()
        );
        Ok(Some(target))
    }
}
