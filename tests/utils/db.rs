/// Database test utilities with singleton pattern
///
/// Tests using these helpers need a reachable PostgreSQL server named by
/// `TEST_DATABASE_URL` and are `#[ignore]`d by default.
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::{Mutex, OnceLock};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static DB_POOL: OnceLock<PgPool> = OnceLock::new();

/// Get or create singleton database pool for tests, migrated on first use
pub fn get_test_db_pool() -> PgPool {
    DB_POOL
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            let test_db_url = std::env::var("TEST_DATABASE_URL")
                .expect("TEST_DATABASE_URL must be set in .env for tests");

            let manager = ConnectionManager::<PgConnection>::new(test_db_url);
            let pool = r2d2::Pool::builder()
                .max_size(5)
                .build(manager)
                .expect("Failed to create test database pool");

            let mut conn = pool.get().expect("Failed to get DB connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("Unable to migrate the test database");

            pool
        })
        .clone()
}

/// Clean all test tables - use at the start of each test
pub fn clean_test_db() {
    let pool = get_test_db_pool();
    let mut conn = pool.get().expect("Failed to get DB connection");

    diesel::sql_query("TRUNCATE TABLE background_jobs, imported_rows RESTART IDENTITY")
        .execute(&mut conn)
        .expect("Failed to clean test tables");
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure tests run serially
/// Returns a guard that releases the lock when dropped
pub fn acquire_test_lock() -> std::sync::MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
