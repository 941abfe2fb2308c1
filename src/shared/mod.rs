// Shared kernel used by every module

pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod utils;
pub mod validation;

pub use config::{AppConfig, ImportConfig};
pub use infrastructure::Database;
