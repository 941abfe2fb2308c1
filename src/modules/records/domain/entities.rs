use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format dates are persisted and grouped by.
pub const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

/// A row that passed every validation rule.
///
/// Only the row validator builds these; nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub external_id: i64,
    pub name: String,
    pub date: NaiveDate,
}

impl NormalizedRow {
    pub fn new(external_id: i64, name: String, date: NaiveDate) -> Self {
        Self {
            external_id,
            name,
            date,
        }
    }

    pub fn stored_date(&self) -> String {
        self.date.format(STORED_DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub id: i64,
    pub external_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
