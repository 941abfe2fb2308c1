/// Spreadsheet import pipeline
///
/// - Domain: raw rows, validation rules, error ledger
/// - Infrastructure: streaming chunk reader and report writer
/// - Application: the run orchestrator and the submission/status service
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::orchestrator::{ImportOrchestrator, ImportRequest, ImportSummary, RunState};
pub use application::service::{ImportAck, ImportService};
pub use domain::{ErrorLedger, RawRow, RowValidator, ValidationErrors};
pub use infrastructure::{ChunkReader, ChunkStream, ReportWriter, SheetFormat};
