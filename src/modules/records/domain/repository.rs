/// Record store contract
///
/// The only guarantee the import pipeline relies on is uniqueness of
/// `external_id`. Implementations report a violated constraint as
/// `AppError::Duplicate` so callers can tell it apart from other failures.
use super::entities::{NormalizedRow, PersistedRecord};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Whether a record with this external id is already stored
    async fn exists(&self, external_id: i64) -> AppResult<bool>;

    /// Persist a validated row
    async fn insert(&self, row: &NormalizedRow) -> AppResult<PersistedRecord>;

    /// All records ordered by date, then by insertion
    async fn find_all(&self) -> AppResult<Vec<PersistedRecord>>;
}
