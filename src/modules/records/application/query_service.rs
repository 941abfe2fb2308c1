use crate::modules::records::domain::{PersistedRecord, RecordRepository, STORED_DATE_FORMAT};
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;
use crate::log_debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Display format for dates in listings, same as the spreadsheet input.
const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub external_id: i64,
    pub name: String,
    pub date: String,
}

impl From<&PersistedRecord> for RecordView {
    fn from(record: &PersistedRecord) -> Self {
        Self {
            external_id: record.external_id,
            name: record.name.clone(),
            date: record.date.format(DISPLAY_DATE_FORMAT).to_string(),
        }
    }
}

pub struct RecordQueryService {
    record_repo: Arc<dyn RecordRepository>,
}

impl RecordQueryService {
    pub fn new(record_repo: Arc<dyn RecordRepository>) -> Self {
        Self { record_repo }
    }

    /// All stored records keyed by their `Y-m-d` date, keys ascending.
    pub async fn grouped_by_date(&self) -> AppResult<BTreeMap<String, Vec<RecordView>>> {
        let timer = TimedOperation::new("records_grouped_by_date");
        let records = self.record_repo.find_all().await?;

        let mut groups: BTreeMap<String, Vec<RecordView>> = BTreeMap::new();
        for record in &records {
            groups
                .entry(record.date.format(STORED_DATE_FORMAT).to_string())
                .or_default()
                .push(RecordView::from(record));
        }

        log_debug!(
            "Grouped {} records into {} dates",
            records.len(),
            groups.len()
        );
        timer.finish();

        Ok(groups)
    }
}
