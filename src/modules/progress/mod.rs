/// Import progress and completion reporting through an external key-value store
///
/// Architecture:
/// - Domain: narrow store capability (`ProgressStore`) and the key layout
/// - Application: `ProgressTracker`, the run-level operations the importer uses
/// - Infrastructure: Redis-backed store
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::tracker::{ImportStatus, ProgressTracker};
pub use domain::{KeyKind, ProgressKeys, ProgressStore};
pub use infrastructure::RedisProgressStore;
