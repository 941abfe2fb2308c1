use crate::modules::jobs::domain::entities::{Job, JobRecord};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// Durable queue of import runs.
///
/// Submissions land here and the background worker drains it in priority then
/// submission order. Backed by the `background_jobs` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Store a submitted import as `pending`
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord>;

    /// Claim the oldest pending import and mark it `running`.
    ///
    /// Two workers never receive the same job. `None` when nothing is waiting.
    async fn dequeue(&self) -> AppResult<Option<JobRecord>>;

    async fn mark_completed(&self, job_id: Uuid) -> AppResult<()>;

    /// Record why the run aborted. The job is not handed out again.
    async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()>;

    async fn get_by_id(&self, job_id: Uuid) -> AppResult<Option<JobRecord>>;

    /// Count of jobs per state
    async fn get_statistics(&self) -> AppResult<JobStatistics>;
}

/// Queue size per state, as reported by the worker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobStatistics {
    pub pending_count: i64,
    pub running_count: i64,
    pub completed_count: i64,
    pub failed_count: i64,
    pub total_count: i64,
}
