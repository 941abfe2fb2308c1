pub mod modules;
mod schema;
pub mod shared;

use modules::{
    data_import::{ImportOrchestrator, ImportService},
    jobs::{BackgroundWorker, JobRepository, JobRepositoryImpl},
    progress::{ProgressStore, ProgressTracker, RedisProgressStore},
    records::{RecordQueryService, RecordRepository, RecordRepositoryImpl},
};
use shared::errors::AppResult;
use shared::{AppConfig, Database};
use std::sync::Arc;

/// Everything a running service needs, wired once at start-up.
#[derive(Clone)]
pub struct AppServices {
    pub import_service: Arc<ImportService>,
    pub record_queries: Arc<RecordQueryService>,
    pub worker: Arc<BackgroundWorker>,
}

/// Wire the services on top of already constructed stores.
pub fn build_services(
    config: &AppConfig,
    record_repo: Arc<dyn RecordRepository>,
    job_repo: Arc<dyn JobRepository>,
    progress_store: Arc<dyn ProgressStore>,
) -> AppResult<AppServices> {
    let tracker = ProgressTracker::new(progress_store);

    let orchestrator = Arc::new(ImportOrchestrator::new(
        &config.import,
        Arc::clone(&record_repo),
        tracker.clone(),
    )?);

    let import_service = Arc::new(ImportService::new(
        Arc::clone(&job_repo),
        tracker,
        config.import.clone(),
    ));

    let record_queries = Arc::new(RecordQueryService::new(record_repo));

    let worker = Arc::new(BackgroundWorker::new(
        job_repo,
        orchestrator,
        config.worker_poll_interval,
    ));

    Ok(AppServices {
        import_service,
        record_queries,
        worker,
    })
}

/// Connect PostgreSQL and Redis, apply migrations and wire the services.
pub async fn bootstrap(config: &AppConfig) -> AppResult<AppServices> {
    let database = Database::new(&config.database_url)?;
    database.run_migrations()?;

    let progress_store: Arc<dyn ProgressStore> =
        Arc::new(RedisProgressStore::connect(&config.redis_url).await?);
    let record_repo: Arc<dyn RecordRepository> =
        Arc::new(RecordRepositoryImpl::new(database.pool().clone()));
    let job_repo: Arc<dyn JobRepository> =
        Arc::new(JobRepositoryImpl::new(database.pool().clone()));

    build_services(config, record_repo, job_repo, progress_store)
}
