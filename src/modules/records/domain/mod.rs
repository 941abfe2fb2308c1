pub mod entities;
pub mod repository;

pub use entities::{NormalizedRow, PersistedRecord, STORED_DATE_FORMAT};
pub use repository::RecordRepository;

#[cfg(test)]
pub use repository::MockRecordRepository;
