/// Domain entities for background job system
///
/// Jobs represent spreadsheet imports queued by callers and processed by the
/// background worker, one run per job.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Import jobs are not retried; a crashed run is not resumed
pub const IMPORT_MAX_ATTEMPTS: i32 = 1;
pub const DEFAULT_PRIORITY: i32 = 5;

/// Job type enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    SpreadsheetImport,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::SpreadsheetImport => write!(f, "spreadsheet_import"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spreadsheet_import" => Ok(JobType::SpreadsheetImport),
            _ => Err(format!("Invalid job type: {}", s)),
        }
    }
}

/// Job payload for spreadsheet import jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetImportPayload {
    pub file_path: String,
    pub progress_key: String,
    pub report_path: String,
}

/// New job to be queued (before insertion to database)
#[derive(Debug, Clone)]
pub struct Job {
    pub job_type: JobType,
    pub payload: serde_json::Value,
    pub priority: i32,
    pub max_attempts: i32,
}

impl Job {
    /// Create a new spreadsheet import job
    pub fn spreadsheet_import(
        payload: &SpreadsheetImportPayload,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            job_type: JobType::SpreadsheetImport,
            payload: serde_json::to_value(payload)?,
            priority: DEFAULT_PRIORITY,
            max_attempts: IMPORT_MAX_ATTEMPTS,
        })
    }
}

/// Job record from database (with metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub job_type: String,
    pub payload: serde_json::Value,
    pub priority: i32,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobRecord {
    /// Parse job type
    pub fn parse_job_type(&self) -> Result<JobType, String> {
        self.job_type.parse()
    }

    /// Parse spreadsheet import payload
    pub fn parse_import_payload(&self) -> Result<SpreadsheetImportPayload, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
