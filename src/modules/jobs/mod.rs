/// Background job system module
///
/// PostgreSQL-backed queue that decouples import submission from execution.
///
/// Architecture:
/// - Domain: Entities and repository trait
/// - Infrastructure: Diesel-based repository implementation
/// - Worker: Background worker that runs queued imports
pub mod domain;
pub mod infrastructure;
pub mod worker;

// Re-exports for easy access
pub use domain::{
    entities::{Job, JobRecord, JobType, SpreadsheetImportPayload},
    repository::{JobRepository, JobStatistics},
};
pub use infrastructure::JobRepositoryImpl;
pub use worker::{BackgroundWorker, WorkerStatistics};
