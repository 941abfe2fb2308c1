/// Runtime configuration read from the environment (and `.env` when present).
use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHUNK_SIZE: usize = 2000;
pub const DEFAULT_PROGRESS_KEY: &str = "excel_import_progress";
pub const DEFAULT_REPORT_PATH: &str = "result.txt";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_STORAGE_DIR: &str = "storage";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub import: ImportConfig,
    pub worker_poll_interval: Duration,
}

/// Settings that shape a single import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub chunk_size: usize,
    /// Root directory report artifacts are written under.
    pub storage_dir: PathBuf,
    pub default_progress_key: String,
    pub default_report_path: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            default_progress_key: DEFAULT_PROGRESS_KEY.to_string(),
            default_report_path: DEFAULT_REPORT_PATH.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::InvalidInput("DATABASE_URL environment variable not found".to_string())
        })?;
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            return Err(AppError::InvalidInput(
                "DATABASE_URL must start with postgres:// or postgresql://".to_string(),
            ));
        }

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());

        let chunk_size = parse_var("IMPORT_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        if chunk_size == 0 {
            return Err(AppError::InvalidInput(
                "IMPORT_CHUNK_SIZE must be greater than zero".to_string(),
            ));
        }

        let import = ImportConfig {
            chunk_size,
            storage_dir: env::var("IMPORT_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR)),
            default_progress_key: env::var("IMPORT_PROGRESS_KEY")
                .unwrap_or_else(|_| DEFAULT_PROGRESS_KEY.to_string()),
            default_report_path: env::var("IMPORT_REPORT_PATH")
                .unwrap_or_else(|_| DEFAULT_REPORT_PATH.to_string()),
        };

        let poll_secs = parse_var("WORKER_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

        Ok(Self {
            database_url,
            redis_url,
            import,
            worker_poll_interval: Duration::from_secs(poll_secs),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("{} has an invalid value '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}
