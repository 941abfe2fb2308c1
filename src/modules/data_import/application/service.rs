use crate::modules::data_import::infrastructure::SheetFormat;
use crate::modules::jobs::{Job, JobRecord, JobRepository, SpreadsheetImportPayload};
use crate::modules::progress::{ImportStatus, ProgressTracker};
use crate::shared::config::ImportConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::log_info;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub const QUEUED_MESSAGE: &str = "File queued for import.";

/// Returned to the caller as soon as a run is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportAck {
    pub job_id: Uuid,
    pub status: String,
    pub progress_key: String,
    pub message: String,
}

/// Entry point for callers: queue imports and poll their progress.
pub struct ImportService {
    job_repo: Arc<dyn JobRepository>,
    tracker: ProgressTracker,
    defaults: ImportConfig,
}

impl ImportService {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        tracker: ProgressTracker,
        defaults: ImportConfig,
    ) -> Self {
        Self {
            job_repo,
            tracker,
            defaults,
        }
    }

    /// Queue exactly one import run for `file_path`.
    ///
    /// Callers running imports side by side must pass distinct progress keys.
    pub async fn submit(
        &self,
        file_path: &str,
        progress_key: Option<String>,
        report_path: Option<String>,
    ) -> AppResult<ImportAck> {
        let path = Path::new(file_path);
        SheetFormat::from_path(path).map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let is_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(AppError::InvalidInput(format!(
                "File not found: {}",
                file_path
            )));
        }

        let payload = SpreadsheetImportPayload {
            file_path: file_path.to_string(),
            progress_key: non_empty_or(progress_key, &self.defaults.default_progress_key),
            report_path: non_empty_or(report_path, &self.defaults.default_report_path),
        };

        let record = self.job_repo.enqueue(Job::spreadsheet_import(&payload)?).await?;
        log_info!(
            "Queued import of {} as job {} (progress key: {})",
            payload.file_path,
            record.id,
            payload.progress_key
        );

        Ok(ImportAck {
            job_id: record.id,
            status: record.status,
            progress_key: payload.progress_key,
            message: QUEUED_MESSAGE.to_string(),
        })
    }

    /// Rows processed so far and whether the run finished
    pub async fn status(&self, progress_key: &str) -> AppResult<ImportStatus> {
        self.tracker.status(progress_key).await
    }

    pub async fn job(&self, job_id: Uuid) -> AppResult<JobRecord> {
        self.job_repo
            .get_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job with ID {} not found", job_id)))
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
