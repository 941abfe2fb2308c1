pub mod data_import;
pub mod jobs;
pub mod progress;
pub mod records;
