use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Type of the value currently stored under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    Missing,
    String,
    Hash,
    Other(String),
}

impl KeyKind {
    /// Map a Redis `TYPE` reply
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "none" => KeyKind::Missing,
            "string" => KeyKind::String,
            "hash" => KeyKind::Hash,
            other => KeyKind::Other(other.to_string()),
        }
    }
}

/// The capabilities the importer needs from the external tracker, nothing more.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn set(&self, key: &str, value: i64) -> AppResult<()>;

    async fn get(&self, key: &str) -> AppResult<Option<i64>>;

    async fn set_field(&self, key: &str, field: &str, value: &str) -> AppResult<()>;

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>>;

    async fn key_kind(&self, key: &str) -> AppResult<KeyKind>;

    async fn delete(&self, key: &str) -> AppResult<()>;
}
