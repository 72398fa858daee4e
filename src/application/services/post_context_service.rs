use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::CacheStore;
use crate::domain::repositories::RedditPostRepository;

pub const ALL_POSTS_CACHE_KEY: &str = "all-reddit-posts";

pub fn post_cache_key(row_id: i32) -> String {
    format!("reddit-post:{}", row_id)
}

/// Supplies the `data` blobs of stored posts for grounding a chat turn.
/// The cache mirror is read first; the database is the fallback.
pub struct PostContextService {
    cache_store: Arc<dyn CacheStore>,
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl PostContextService {
    pub fn new(
        cache_store: Arc<dyn CacheStore>,
        reddit_post_repository: Arc<dyn RedditPostRepository>,
    ) -> Self {
        Self {
            cache_store,
            reddit_post_repository,
        }
    }

    /// Never fails: a broken cache or database means an empty context.
    pub async fn load_context(&self) -> Vec<Value> {
        if let Some(cached) = self.load_from_cache().await {
            return cached;
        }

        match self.reddit_post_repository.find_all_data().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Error fetching Reddit posts: {}", e);
                Vec::new()
            }
        }
    }

    async fn load_from_cache(&self) -> Option<Vec<Value>> {
        let raw = match self.cache_store.get(ALL_POSTS_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Cache lookup for {} failed: {}", ALL_POSTS_CACHE_KEY, e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(rows) => Some(
                rows.into_iter()
                    .filter_map(|mut row| row.get_mut("data").map(Value::take))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!("Ignoring malformed cache entry {}: {}", ALL_POSTS_CACHE_KEY, e);
                None
            }
        }
    }
}
