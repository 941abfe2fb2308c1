use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a queued import stands, stored as the `job_status` Postgres enum.
///
/// A worker moves a row from `Pending` to `Running` when it claims it, then to
/// `Completed` or `Failed`. Both end states are final.
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::JobStatus"]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    /// Label as stored in the database and shown to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
