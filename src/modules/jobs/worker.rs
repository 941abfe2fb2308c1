/// Background worker for spreadsheet import jobs
///
/// Polls the job queue and runs one import at a time, strictly in queue order.
use crate::modules::data_import::application::orchestrator::{
    ImportOrchestrator, ImportRequest, ImportSummary,
};
use crate::modules::jobs::domain::entities::{JobRecord, JobType};
use crate::modules::jobs::domain::repository::JobRepository;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_error, log_info, log_warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Background worker that processes jobs from the queue
pub struct BackgroundWorker {
    job_repository: Arc<dyn JobRepository>,
    importer: Arc<ImportOrchestrator>,
    poll_interval: Duration,
    is_running: Arc<tokio::sync::RwLock<bool>>,
    shutdown: CancellationToken,
}

impl BackgroundWorker {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        importer: Arc<ImportOrchestrator>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            job_repository,
            importer,
            poll_interval,
            is_running: Arc::new(tokio::sync::RwLock::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Run the worker loop until [`stop`](Self::stop) is called.
    ///
    /// Spawn it with `tokio::spawn` to run in the background. A stopped worker
    /// stays stopped.
    pub async fn run(self: Arc<Self>) {
        if self.shutdown.is_cancelled() {
            return;
        }
        log_info!("Background worker started");
        *self.is_running.write().await = true;

        loop {
            if !*self.is_running.read().await {
                log_info!("Background worker stopped");
                break;
            }

            match self.process_next_job().await {
                // Drain the queue before sleeping again
                Ok(true) => {}
                Ok(false) => self.idle().await,
                Err(e) => {
                    log_error!("Error in worker loop: {}", e);
                    self.idle().await;
                }
            }
        }
    }

    /// Sleep one poll interval, waking early on shutdown
    async fn idle(&self) {
        tokio::select! {
            _ = tokio::time::sleep(self.poll_interval) => {}
            _ = self.shutdown.cancelled() => {}
        }
    }

    /// Stop the background worker after the job in progress, if any
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        self.shutdown.cancel();
        log_info!("Background worker stop requested");
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Process the next job in the queue
    ///
    /// Returns true if a job was processed, false if queue was empty
    pub async fn process_next_job(&self) -> AppResult<bool> {
        let job = match self.job_repository.dequeue().await? {
            Some(job) => job,
            None => return Ok(false),
        };

        log_info!(
            "Processing job {} (type: {}, attempt {}/{})",
            job.id,
            job.job_type,
            job.attempts,
            job.max_attempts
        );

        let result = match job.parse_job_type() {
            Ok(JobType::SpreadsheetImport) => self.handle_import_job(&job).await.map(|_| ()),
            Err(e) => Err(AppError::ValidationError(format!("Invalid job type: {}", e))),
        };

        match result {
            Ok(()) => {
                self.job_repository.mark_completed(job.id).await?;
                log_info!("Job {} completed successfully", job.id);
            }
            Err(e) => {
                let error_msg = e.to_string();
                log_warn!("Job {} failed: {}", job.id, error_msg);
                self.job_repository.mark_failed(job.id, &error_msg).await?;
            }
        }

        Ok(true)
    }

    async fn handle_import_job(&self, job: &JobRecord) -> AppResult<ImportSummary> {
        let payload = job.parse_import_payload().map_err(|e| {
            AppError::ValidationError(format!("Invalid spreadsheet import payload: {}", e))
        })?;

        let request = ImportRequest {
            file_path: payload.file_path,
            progress_key: payload.progress_key,
            report_path: payload.report_path,
        };

        let summary = self.importer.run(&request).await?;
        log_info!(
            "Import of {} finished: {} rows, {} imported, {} failed lines",
            request.file_path,
            summary.total_rows,
            summary.imported,
            summary.failed_lines
        );
        Ok(summary)
    }

    /// Get statistics about the worker and job queue
    pub async fn get_statistics(&self) -> AppResult<WorkerStatistics> {
        let job_stats = self.job_repository.get_statistics().await?;

        Ok(WorkerStatistics {
            is_running: self.is_running().await,
            pending_jobs: job_stats.pending_count,
            running_jobs: job_stats.running_count,
            completed_jobs: job_stats.completed_count,
            failed_jobs: job_stats.failed_count,
            total_jobs: job_stats.total_count,
        })
    }
}

/// Worker statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatistics {
    pub is_running: bool,
    pub pending_jobs: i64,
    pub running_jobs: i64,
    pub completed_jobs: i64,
    pub failed_jobs: i64,
    pub total_jobs: i64,
}
