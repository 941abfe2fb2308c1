/// In-memory stand-ins for the record store, the progress store and the job queue
///
/// They follow the same contracts as the PostgreSQL and Redis implementations,
/// including unique-violation and wrong-type errors.
use async_trait::async_trait;
use chrono::Utc;
use rowport_lib::modules::jobs::{Job, JobRecord, JobRepository, JobStatistics};
use rowport_lib::modules::progress::{KeyKind, ProgressStore};
use rowport_lib::modules::records::{NormalizedRow, PersistedRecord, RecordRepository};
use rowport_lib::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

// ============= RECORD STORE =============

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<PersistedRecord>>,
    inserts: Mutex<usize>,
    fail_on_insert: Mutex<Option<usize>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the given external ids
    pub fn with_existing(ids: &[i64]) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.lock().unwrap();
            for (index, id) in ids.iter().enumerate() {
                records.push(PersistedRecord {
                    id: index as i64 + 1,
                    external_id: *id,
                    name: "Seeded".to_string(),
                    date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                    created_at: Utc::now(),
                });
            }
        }
        store
    }

    /// Make the n-th insert attempt (1-based) fail with a database error
    pub fn fail_on_insert(&self, attempt: usize) {
        *self.fail_on_insert.lock().unwrap() = Some(attempt);
    }

    pub fn records(&self) -> Vec<PersistedRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn external_ids(&self) -> Vec<i64> {
        self.records().iter().map(|r| r.external_id).collect()
    }

    pub fn find(&self, external_id: i64) -> Option<PersistedRecord> {
        self.records()
            .into_iter()
            .find(|r| r.external_id == external_id)
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordStore {
    async fn exists(&self, external_id: i64) -> AppResult<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.external_id == external_id))
    }

    async fn insert(&self, row: &NormalizedRow) -> AppResult<PersistedRecord> {
        let attempt = {
            let mut inserts = self.inserts.lock().unwrap();
            *inserts += 1;
            *inserts
        };
        if *self.fail_on_insert.lock().unwrap() == Some(attempt) {
            return Err(AppError::DatabaseError("connection reset by peer".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.external_id == row.external_id) {
            return Err(AppError::Duplicate(
                "duplicate key value violates unique constraint \"imported_rows_external_id_key\""
                    .to_string(),
            ));
        }

        let record = PersistedRecord {
            id: records.len() as i64 + 1,
            external_id: row.external_id,
            name: row.name.clone(),
            date: row.date,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> AppResult<Vec<PersistedRecord>> {
        let mut records = self.records();
        records.sort_by_key(|r| (r.date, r.id));
        Ok(records)
    }
}

// ============= PROGRESS STORE =============

#[derive(Debug, Clone)]
enum Entry {
    Int(i64),
    Text(String),
    Hash(HashMap<String, String>),
}

#[derive(Default)]
pub struct InMemoryProgressStore {
    entries: Mutex<HashMap<String, Entry>>,
    writes: Mutex<Vec<(String, i64)>>,
    unavailable: Mutex<bool>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later call fails as if the server went away
    pub fn go_down(&self) {
        *self.unavailable.lock().unwrap() = true;
    }

    pub fn seed_text(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Entry::Text(value.to_string()));
    }

    pub fn counter(&self, key: &str) -> Option<i64> {
        match self.entries.lock().unwrap().get(key) {
            Some(Entry::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn field(&self, key: &str, field: &str) -> Option<String> {
        match self.entries.lock().unwrap().get(key) {
            Some(Entry::Hash(fields)) => fields.get(field).cloned(),
            _ => None,
        }
    }

    /// Values written to `key`, oldest first
    pub fn history(&self, key: &str) -> Vec<i64> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| *v)
            .collect()
    }

    fn check_available(&self) -> AppResult<()> {
        if *self.unavailable.lock().unwrap() {
            Err(AppError::TrackerError("Connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn wrong_type() -> AppError {
    AppError::TrackerError(
        "WRONGTYPE Operation against a key holding the wrong kind of value".to_string(),
    )
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn set(&self, key: &str, value: i64) -> AppResult<()> {
        self.check_available()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Entry::Int(value));
        self.writes.lock().unwrap().push((key.to_string(), value));
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<i64>> {
        self.check_available()?;
        match self.entries.lock().unwrap().get(key) {
            None => Ok(None),
            Some(Entry::Int(value)) => Ok(Some(*value)),
            Some(Entry::Text(text)) => text
                .parse()
                .map(Some)
                .map_err(|_| AppError::TrackerError("value is not an integer".to_string())),
            Some(Entry::Hash(_)) => Err(wrong_type()),
        }
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        self.check_available()?;
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        match entry {
            Entry::Hash(fields) => {
                fields.insert(field.to_string(), value.to_string());
                Ok(())
            }
            _ => Err(wrong_type()),
        }
    }

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        self.check_available()?;
        match self.entries.lock().unwrap().get(key) {
            None => Ok(None),
            Some(Entry::Hash(fields)) => Ok(fields.get(field).cloned()),
            Some(_) => Err(wrong_type()),
        }
    }

    async fn key_kind(&self, key: &str) -> AppResult<KeyKind> {
        self.check_available()?;
        Ok(match self.entries.lock().unwrap().get(key) {
            None => KeyKind::Missing,
            Some(Entry::Int(_)) | Some(Entry::Text(_)) => KeyKind::String,
            Some(Entry::Hash(_)) => KeyKind::Hash,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.check_available()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============= JOB QUEUE =============

#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<JobRecord>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobQueue {
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord> {
        let record = JobRecord {
            id: Uuid::new_v4(),
            job_type: job.job_type.to_string(),
            payload: job.payload,
            priority: job.priority,
            status: "pending".to_string(),
            attempts: 0,
            max_attempts: job.max_attempts,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error: None,
        };
        self.jobs.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn dequeue(&self) -> AppResult<Option<JobRecord>> {
        let mut jobs = self.jobs.lock().unwrap();
        let next = jobs
            .iter_mut()
            .filter(|j| j.status == "pending")
            .min_by_key(|j| (j.priority, j.created_at));

        Ok(next.map(|job| {
            job.status = "running".to_string();
            job.started_at = Some(Utc::now());
            job.attempts += 1;
            job.clone()
        }))
    }

    async fn mark_completed(&self, job_id: Uuid) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == job_id) {
            job.status = "completed".to_string();
            job.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == job_id) {
            job.status = "failed".to_string();
            job.completed_at = Some(Utc::now());
            job.error = Some(error.to_string());
        }
        Ok(())
    }

    async fn get_by_id(&self, job_id: Uuid) -> AppResult<Option<JobRecord>> {
        Ok(self.jobs().into_iter().find(|j| j.id == job_id))
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        let jobs = self.jobs();
        let count = |status: &str| jobs.iter().filter(|j| j.status == status).count() as i64;

        Ok(JobStatistics {
            pending_count: count("pending"),
            running_count: count("running"),
            completed_count: count("completed"),
            failed_count: count("failed"),
            total_count: jobs.len() as i64,
        })
    }
}
