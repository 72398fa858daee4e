use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::ports::cache_store::{CacheEntry, CacheError, CacheStore};

/// Process-local cache used when no Redis URL is configured.
/// Expired entries are dropped lazily on read.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: DashMap<String, (String, Instant)>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn set_many(&self, entries: &[CacheEntry], ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        for entry in entries {
            self.entries
                .insert(entry.key.clone(), (entry.value.clone(), expires_at));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.1 > now => return Ok(Some(entry.0.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        self.entries
            .remove_if(key, |_, (_, expires_at)| *expires_at <= now);
        Ok(None)
    }
}
