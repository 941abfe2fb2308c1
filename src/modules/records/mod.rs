/// Persisted spreadsheet rows
///
/// - Domain: normalized row, persisted record and the store contract
/// - Infrastructure: Diesel-backed store on `imported_rows`
/// - Application: read-side queries for callers listing imported data
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::query_service::{RecordQueryService, RecordView};
pub use domain::{NormalizedRow, PersistedRecord, RecordRepository};
pub use infrastructure::RecordRepositoryImpl;
