use crate::log_info;
use crate::modules::progress::domain::{KeyKind, ProgressStore};
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

/// Redis-backed progress store sharing one multiplexed connection.
#[derive(Clone)]
pub struct RedisProgressStore {
    conn: MultiplexedConnection,
}

impl RedisProgressStore {
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| AppError::TrackerError(format!("Invalid Redis URL: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::TrackerError(format!("Redis connection failed: {}", e)))?;

        log_info!(
            "Progress store connected to {}",
            redis_url.split('@').last().unwrap_or("unknown_host")
        );

        Ok(Self { conn })
    }
}

#[async_trait]
impl ProgressStore for RedisProgressStore {
    async fn set(&self, key: &str, value: i64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<i64>> {
        let mut conn = self.conn.clone();
        let value: Option<i64> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.hset::<_, _, _, ()>(key, field, value).await?;
        Ok(())
    }

    async fn get_field(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn key_kind(&self, key: &str) -> AppResult<KeyKind> {
        let mut conn = self.conn.clone();
        let kind: String = redis::cmd("TYPE")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(KeyKind::from_type_name(&kind))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
