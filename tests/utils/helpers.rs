/// Test helper functions and service builders
use super::fakes::{InMemoryJobQueue, InMemoryProgressStore, InMemoryRecordStore};
use rowport_lib::modules::data_import::{ImportOrchestrator, ImportRequest};
use rowport_lib::modules::progress::ProgressTracker;
use rowport_lib::shared::{AppConfig, ImportConfig};
use rowport_lib::{build_services, AppServices};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub fn test_config(storage_dir: &Path, chunk_size: usize) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        redis_url: "redis://unused".to_string(),
        import: ImportConfig {
            chunk_size,
            storage_dir: storage_dir.to_path_buf(),
            ..ImportConfig::default()
        },
        worker_poll_interval: Duration::from_millis(10),
    }
}

/// Fully wired services on top of in-memory stores
pub struct TestServices {
    pub services: AppServices,
    pub records: Arc<InMemoryRecordStore>,
    pub progress: Arc<InMemoryProgressStore>,
    pub jobs: Arc<InMemoryJobQueue>,
    /// Storage directory; reports land here
    pub storage: TempDir,
}

pub fn build_test_services(chunk_size: usize) -> TestServices {
    build_test_services_with(InMemoryRecordStore::new(), chunk_size)
}

pub fn build_test_services_with(records: InMemoryRecordStore, chunk_size: usize) -> TestServices {
    let storage = tempfile::tempdir().expect("Failed to create storage dir");
    let records = Arc::new(records);
    let progress = Arc::new(InMemoryProgressStore::new());
    let jobs = Arc::new(InMemoryJobQueue::new());

    let services = build_services(
        &test_config(storage.path(), chunk_size),
        records.clone(),
        jobs.clone(),
        progress.clone(),
    )
    .expect("Failed to build services");

    TestServices {
        services,
        records,
        progress,
        jobs,
        storage,
    }
}

/// Orchestrator and its stores, for driving runs without the job queue
pub struct TestImporter {
    pub importer: ImportOrchestrator,
    pub records: Arc<InMemoryRecordStore>,
    pub progress: Arc<InMemoryProgressStore>,
    pub storage: TempDir,
}

pub fn build_importer(records: InMemoryRecordStore, chunk_size: usize) -> TestImporter {
    let storage = tempfile::tempdir().expect("Failed to create storage dir");
    let records = Arc::new(records);
    let progress = Arc::new(InMemoryProgressStore::new());
    let config = test_config(storage.path(), chunk_size);

    let importer = ImportOrchestrator::new(
        &config.import,
        records.clone(),
        ProgressTracker::new(progress.clone()),
    )
    .expect("Failed to build importer");

    TestImporter {
        importer,
        records,
        progress,
        storage,
    }
}

pub fn import_request(file: &Path, progress_key: &str) -> ImportRequest {
    ImportRequest {
        file_path: file.to_string_lossy().into_owned(),
        progress_key: progress_key.to_string(),
        report_path: "result.txt".to_string(),
    }
}
