use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use std::time::Duration;

use crate::application::ports::cache_store::{CacheEntry, CacheError, CacheStore};

pub fn create_redis_pool(url: &str) -> Result<Pool, CacheError> {
    let cfg = Config::from_url(url);
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| CacheError::ConnectionError(e.to_string()))
}

#[derive(Clone)]
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn set_many(&self, entries: &[CacheEntry], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        let ttl_secs = ttl.as_secs().max(1);
        let mut pipe = redis::pipe();
        for entry in entries {
            pipe.set_ex(&entry.key, &entry.value, ttl_secs).ignore();
        }

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| CacheError::CommandError(e.to_string()))?;

        tracing::debug!("Wrote {} cache entries", entries.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::CommandError(e.to_string()))
    }
}
