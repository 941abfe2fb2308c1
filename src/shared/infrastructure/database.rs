use crate::log_info;
use crate::shared::errors::AppError;
use crate::shared::utils::logger::LogContext;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn new(database_url: &str) -> Result<Self, AppError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);

        let pool_config = Self::get_optimal_pool_config();
        let pool = r2d2::Pool::builder()
            .max_size(pool_config.max_size)
            .min_idle(Some(pool_config.min_idle))
            .connection_timeout(Duration::from_secs(10)) // Time to wait for connection from pool
            .idle_timeout(Some(Duration::from_secs(300))) // Close idle connections after 5 minutes
            .max_lifetime(Some(Duration::from_secs(1800)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create connection pool: {}", e))
            })?;

        // Log the target without exposing credentials
        log_info!(
            "Database connection pool initialized for {} (max_size: {}, min_idle: {})",
            database_url.split('@').last().unwrap_or("unknown_host"),
            pool.max_size(),
            pool_config.min_idle
        );

        Ok(Self { pool })
    }

    /// Import runs hold at most one connection each, so the pool tracks the CPU count
    fn get_optimal_pool_config() -> PoolConfig {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        let max_size = std::cmp::min(cpu_count * 2, 20);
        let min_idle = std::cmp::max(2, max_size / 4);

        PoolConfig {
            max_size: max_size as u32,
            min_idle: min_idle as u32,
        }
    }

    pub fn get_connection(&self) -> Result<DbConnection, AppError> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration = start.elapsed().as_millis() as u64;
                if duration > 100 {
                    LogContext::performance_metric("db_connection_acquire", duration, Some("slow"));
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    "Failed to acquire database connection from pool",
                );
                Err(AppError::from(e))
            }
        }
    }

    /// Apply any embedded migrations that have not run yet
    pub fn run_migrations(&self) -> Result<(), AppError> {
        let mut conn = self.get_connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;

        log_info!("Database migrations completed ({} applied)", applied.len());
        Ok(())
    }

    /// Pool handed to the repositories
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[derive(Debug)]
struct PoolConfig {
    max_size: u32,
    min_idle: u32,
}
