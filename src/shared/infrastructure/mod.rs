/// Shared infrastructure concerns
///
/// Infrastructure used by more than one module: the PostgreSQL pool and its migrations.
pub mod database;

pub use database::{Database, DbConnection, DbPool};
