use crate::modules::progress::domain::keys::FINISHED_FIELD;
use crate::modules::progress::domain::{KeyKind, ProgressKeys, ProgressStore};
use crate::shared::errors::AppResult;
use crate::{log_debug, log_warn};
use serde::Serialize;
use std::sync::Arc;

/// What a polling caller sees for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStatus {
    pub processed: i64,
    pub finished: bool,
}

/// Run-level progress operations on top of a [`ProgressStore`].
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn ProgressStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Zero the counter and drop the completion flag of any earlier run on
    /// the same key
    pub async fn reset(&self, run_key: &str) -> AppResult<()> {
        let keys = ProgressKeys::for_run(run_key);
        self.store.set(&keys.counter, 0).await?;
        self.store.delete(&keys.status).await
    }

    /// Add `rows` to the counter and return the new total.
    ///
    /// Read-then-write, so two runs sharing a key race each other. Run keys must
    /// be distinct per run.
    pub async fn advance(&self, run_key: &str, rows: usize) -> AppResult<i64> {
        let keys = ProgressKeys::for_run(run_key);
        let current = self.store.get(&keys.counter).await?.unwrap_or(0);
        let total = current + rows as i64;
        self.store.set(&keys.counter, total).await?;

        log_debug!("Progress [{}]: {} rows", run_key, total);
        Ok(total)
    }

    /// Set the completion flag, clearing a stale non-hash value first
    pub async fn mark_finished(&self, run_key: &str) -> AppResult<()> {
        let keys = ProgressKeys::for_run(run_key);

        match self.store.key_kind(&keys.status).await? {
            KeyKind::Missing | KeyKind::Hash => {}
            other => {
                log_warn!(
                    "Status key {} holds a {:?} value, deleting it",
                    keys.status,
                    other
                );
                self.store.delete(&keys.status).await?;
            }
        }

        self.store
            .set_field(&keys.status, FINISHED_FIELD, "1")
            .await
    }

    pub async fn status(&self, run_key: &str) -> AppResult<ImportStatus> {
        let keys = ProgressKeys::for_run(run_key);
        let processed = self.store.get(&keys.counter).await?.unwrap_or(0);
        let finished = matches!(
            self.store.get_field(&keys.status, FINISHED_FIELD).await?.as_deref(),
            Some("1") | Some("true")
        );

        Ok(ImportStatus {
            processed,
            finished,
        })
    }
}
