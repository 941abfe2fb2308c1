/// Diesel-based implementation of JobRepository
///
/// Uses PostgreSQL with SELECT FOR UPDATE SKIP LOCKED for atomic job dequeuing.
use crate::modules::jobs::domain::entities::{Job, JobRecord};
use crate::modules::jobs::domain::repository::{JobRepository, JobStatistics};
use crate::modules::jobs::infrastructure::models::{BackgroundJobModel, NewJob};
use crate::schema::background_jobs;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{DbConnection, DbPool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, job_type, payload, priority, status, attempts, max_attempts, \
                           created_at, started_at, completed_at, error";

/// Row shape of the statistics query
#[derive(QueryableByName)]
struct StatisticsRow {
    #[diesel(sql_type = BigInt)]
    pending: i64,
    #[diesel(sql_type = BigInt)]
    running: i64,
    #[diesel(sql_type = BigInt)]
    completed: i64,
    #[diesel(sql_type = BigInt)]
    failed: i64,
    #[diesel(sql_type = BigInt)]
    total: i64,
}

pub struct JobRepositoryImpl {
    pool: DbPool,
}

impl JobRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> AppResult<DbConnection> {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }
}

fn query_failed(action: &'static str) -> impl Fn(diesel::result::Error) -> AppError {
    move |e| AppError::DatabaseError(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord> {
        let new_job = NewJob {
            job_type: job.job_type.to_string(),
            payload: job.payload,
            priority: job.priority,
            max_attempts: job.max_attempts,
        };

        let mut conn = self.get_conn()?;
        let inserted: BackgroundJobModel = diesel::insert_into(background_jobs::table)
            .values(&new_job)
            .returning(BackgroundJobModel::as_returning())
            .get_result(&mut conn)
            .map_err(query_failed("enqueue job"))?;

        Ok(inserted.to_job_record())
    }

    async fn dequeue(&self) -> AppResult<Option<JobRecord>> {
        let mut conn = self.get_conn()?;

        // Claim one pending job; concurrent workers skip rows already locked
        let claimed: Option<BackgroundJobModel> = diesel::sql_query(format!(
            "UPDATE background_jobs
             SET status = 'running', started_at = NOW(), attempts = attempts + 1
             WHERE id = (
                 SELECT id FROM background_jobs
                 WHERE status = 'pending'
                 ORDER BY priority ASC, created_at ASC
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {}",
            JOB_COLUMNS
        ))
        .get_result(&mut conn)
        .optional()
        .map_err(query_failed("dequeue job"))?;

        Ok(claimed.map(BackgroundJobModel::to_job_record))
    }

    async fn mark_completed(&self, job_id: Uuid) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            "UPDATE background_jobs
             SET status = 'completed', completed_at = NOW(), error = NULL
             WHERE id = $1",
        )
        .bind::<diesel::sql_types::Uuid, _>(job_id)
        .execute(&mut conn)
        .map_err(query_failed("mark job as completed"))?;

        Ok(())
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        // Imports are not retried; a failed job stays failed
        diesel::sql_query(
            "UPDATE background_jobs
             SET status = 'failed', completed_at = NOW(), error = $2
             WHERE id = $1",
        )
        .bind::<diesel::sql_types::Uuid, _>(job_id)
        .bind::<Text, _>(error)
        .execute(&mut conn)
        .map_err(query_failed("mark job as failed"))?;

        Ok(())
    }

    async fn get_by_id(&self, job_id: Uuid) -> AppResult<Option<JobRecord>> {
        let mut conn = self.get_conn()?;

        let job: Option<BackgroundJobModel> = background_jobs::table
            .find(job_id)
            .select(BackgroundJobModel::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_failed("get job by id"))?;

        Ok(job.map(BackgroundJobModel::to_job_record))
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        let mut conn = self.get_conn()?;

        let row: StatisticsRow = diesel::sql_query(
            "SELECT
                 COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                 COUNT(*) FILTER (WHERE status = 'running') AS running,
                 COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                 COUNT(*) FILTER (WHERE status = 'failed') AS failed,
                 COUNT(*) AS total
             FROM background_jobs",
        )
        .get_result(&mut conn)
        .map_err(query_failed("collect job statistics"))?;

        Ok(JobStatistics {
            pending_count: row.pending,
            running_count: row.running,
            completed_count: row.completed,
            failed_count: row.failed,
            total_count: row.total,
        })
    }
}
