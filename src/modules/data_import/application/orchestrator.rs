use crate::modules::data_import::domain::raw_row::ID_COLUMN;
use crate::modules::data_import::domain::{ErrorLedger, RawRow, RowValidator, ValidationErrors};
use crate::modules::data_import::infrastructure::{ChunkReader, ReportWriter};
use crate::modules::progress::ProgressTracker;
use crate::modules::records::domain::{NormalizedRow, RecordRepository};
use crate::shared::config::ImportConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_info, log_warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Header occupies line 1, so the first data row of the file is line 2
const FIRST_DATA_LINE: u64 = 2;

/// Everything one run needs to know about its input and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub file_path: String,
    /// Run key the progress counter and completion flag hang off
    pub progress_key: String,
    pub report_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_rows: u64,
    pub imported: u64,
    pub failed_lines: u64,
    /// Set only when at least one line failed
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Running,
    Finalizing,
    Completed,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Initialized => write!(f, "initialized"),
            RunState::Running => write!(f, "running"),
            RunState::Finalizing => write!(f, "finalizing"),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Mutable state of a single run. Lives only as long as the run.
struct ImportRun<'a> {
    request: &'a ImportRequest,
    state: RunState,
    ledger: ErrorLedger,
    rows_seen: u64,
    imported: u64,
}

impl<'a> ImportRun<'a> {
    fn new(request: &'a ImportRequest) -> Self {
        Self {
            request,
            state: RunState::Initialized,
            ledger: ErrorLedger::new(),
            rows_seen: 0,
            imported: 0,
        }
    }

    fn transition(&mut self, next: RunState) {
        log_info!(
            "Import [{}]: {} -> {}",
            self.request.progress_key,
            self.state,
            next
        );
        self.state = next;
    }
}

/// Drives one import run from the first batch to the completion flag.
///
/// Row-level problems end up in the error report. Anything else (unreadable
/// file, record store or tracker failure, report write failure) aborts the run
/// before the completion flag is set; rows inserted so far stay inserted.
pub struct ImportOrchestrator {
    reader: ChunkReader,
    validator: RowValidator,
    record_repo: Arc<dyn RecordRepository>,
    tracker: ProgressTracker,
    reports: ReportWriter,
}

impl ImportOrchestrator {
    pub fn new(
        config: &ImportConfig,
        record_repo: Arc<dyn RecordRepository>,
        tracker: ProgressTracker,
    ) -> AppResult<Self> {
        Ok(Self {
            reader: ChunkReader::new(config.chunk_size),
            validator: RowValidator::new(record_repo.clone())?,
            record_repo,
            tracker,
            reports: ReportWriter::new(config.storage_dir.clone()),
        })
    }

    pub async fn run(&self, request: &ImportRequest) -> AppResult<ImportSummary> {
        let timer = TimedOperation::new("spreadsheet_import");
        let mut run = ImportRun::new(request);

        match self.execute(&mut run).await {
            Ok(summary) => {
                timer.finish_with_info(&format!(
                    "{} rows, {} imported, {} failed lines",
                    summary.total_rows, summary.imported, summary.failed_lines
                ));
                Ok(summary)
            }
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    &format!(
                        "Import [{}] aborted while {} after {} rows",
                        request.progress_key, run.state, run.rows_seen
                    ),
                );
                run.transition(RunState::Failed);
                timer.finish();
                Err(e)
            }
        }
    }

    async fn execute(&self, run: &mut ImportRun<'_>) -> AppResult<ImportSummary> {
        let request = run.request;
        let key = request.progress_key.as_str();

        self.tracker.reset(key).await?;
        run.transition(RunState::Running);

        let mut stream = self.reader.open(&request.file_path)?;
        while let Some(batch) = stream.next_batch().await? {
            let first_line = run.rows_seen + FIRST_DATA_LINE;
            let failed_before = run.ledger.len();

            for (index, row) in batch.iter().enumerate() {
                let line = first_line + index as u64;
                match self.validator.validate(row, line).await? {
                    Ok(normalized) => self.persist(run, row, normalized, line).await?,
                    Err(errors) => run.ledger.record(errors),
                }
            }

            run.rows_seen += batch.len() as u64;
            self.tracker.advance(key, batch.len()).await?;
            LogContext::import_progress(
                key,
                first_line,
                batch.len(),
                run.ledger.len() - failed_before,
            );
        }

        run.transition(RunState::Finalizing);
        let report_path = self.reports.write(&request.report_path, &run.ledger).await?;

        self.tracker.mark_finished(key).await?;
        run.transition(RunState::Completed);

        Ok(ImportSummary {
            total_rows: run.rows_seen,
            imported: run.imported,
            failed_lines: run.ledger.len() as u64,
            report_path,
        })
    }

    /// Insert a validated row. A unique violation here means another run stored
    /// the same id after our duplicate check; it is reported like any duplicate.
    async fn persist(
        &self,
        run: &mut ImportRun<'_>,
        row: &RawRow,
        normalized: NormalizedRow,
        line: u64,
    ) -> AppResult<()> {
        match self.record_repo.insert(&normalized).await {
            Ok(_) => {
                run.imported += 1;
                Ok(())
            }
            Err(AppError::Duplicate(detail)) => {
                log_warn!(
                    "Line {}: id {} was stored concurrently ({})",
                    line,
                    normalized.external_id,
                    detail
                );
                let raw_id = row.get(ID_COLUMN).unwrap_or_default();
                run.ledger.record(ValidationErrors::new(
                    line,
                    vec![format!("duplicate id {}", raw_id)],
                ));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
