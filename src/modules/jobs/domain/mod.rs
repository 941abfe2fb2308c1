pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Job, JobRecord, JobType, SpreadsheetImportPayload};
pub use repository::JobRepository;
pub use value_objects::JobState;

#[cfg(test)]
pub use repository::MockJobRepository;
