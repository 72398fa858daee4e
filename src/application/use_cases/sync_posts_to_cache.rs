use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::CacheStore;
use crate::application::ports::cache_store::CacheEntry;
use crate::application::services::post_context_service::{ALL_POSTS_CACHE_KEY, post_cache_key};
use crate::domain::repositories::RedditPostRepository;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug)]
pub enum SyncPostsToCacheError {
    NoPosts,
    RepositoryError(String),
    CacheError(String),
}

impl std::fmt::Display for SyncPostsToCacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPostsToCacheError::NoPosts => write!(f, "No Reddit posts found"),
            SyncPostsToCacheError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            SyncPostsToCacheError::CacheError(msg) => write!(f, "Cache error: {}", msg),
        }
    }
}

impl std::error::Error for SyncPostsToCacheError {}

/// Copies every stored post into the cache, one key per row plus one key
/// holding the full list, all written in a single batch.
pub struct SyncPostsToCacheUseCase {
    reddit_post_repository: Arc<dyn RedditPostRepository>,
    cache_store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl SyncPostsToCacheUseCase {
    pub fn new(
        reddit_post_repository: Arc<dyn RedditPostRepository>,
        cache_store: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            reddit_post_repository,
            cache_store,
            ttl,
        }
    }

    /// Returns the number of posts synced.
    pub async fn execute(&self) -> Result<usize, SyncPostsToCacheError> {
        let posts = self
            .reddit_post_repository
            .find_all()
            .await
            .map_err(|e| SyncPostsToCacheError::RepositoryError(e.to_string()))?;

        if posts.is_empty() {
            return Err(SyncPostsToCacheError::NoPosts);
        }

        let mut entries = Vec::with_capacity(posts.len() + 1);
        for post in &posts {
            let Some(id) = post.id() else { continue };
            entries.push(
                CacheEntry::json(post_cache_key(id), post)
                    .map_err(|e| SyncPostsToCacheError::CacheError(e.to_string()))?,
            );
        }
        entries.push(
            CacheEntry::json(ALL_POSTS_CACHE_KEY, &posts)
                .map_err(|e| SyncPostsToCacheError::CacheError(e.to_string()))?,
        );

        self.cache_store
            .set_many(&entries, self.ttl)
            .await
            .map_err(|e| SyncPostsToCacheError::CacheError(e.to_string()))?;

        tracing::info!("Synced {} Reddit posts to cache", posts.len());
        Ok(posts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeCacheStore, FakeRedditPostRepository, sample_post};
    use crate::application::services::PostContextService;

    #[tokio::test]
    async fn test_sync_writes_row_keys_and_full_list() {
        let repository = Arc::new(FakeRedditPostRepository::with_posts(vec![
            sample_post("a"),
            sample_post("b"),
        ]));
        let cache = Arc::new(FakeCacheStore::default());
        let use_case = SyncPostsToCacheUseCase::new(repository.clone(), cache.clone(), DEFAULT_CACHE_TTL);

        let count = use_case.execute().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            cache.keys(),
            vec!["all-reddit-posts", "reddit-post:1", "reddit-post:2"]
        );
        assert_eq!(cache.ttl_of("reddit-post:1"), Some(Duration::from_secs(604_800)));

        // The synced list is what chat context reads back.
        let context = PostContextService::new(cache, Arc::new(FakeRedditPostRepository::failing()))
            .load_context()
            .await;
        assert_eq!(context.len(), 2);
    }

    #[tokio::test]
    async fn test_no_posts() {
        let use_case = SyncPostsToCacheUseCase::new(
            Arc::new(FakeRedditPostRepository::default()),
            Arc::new(FakeCacheStore::default()),
            DEFAULT_CACHE_TTL,
        );
        assert!(matches!(use_case.execute().await, Err(SyncPostsToCacheError::NoPosts)));
    }

    #[tokio::test]
    async fn test_cache_failure() {
        let use_case = SyncPostsToCacheUseCase::new(
            Arc::new(FakeRedditPostRepository::with_posts(vec![sample_post("a")])),
            Arc::new(FakeCacheStore::failing()),
            DEFAULT_CACHE_TTL,
        );
        assert!(matches!(use_case.execute().await, Err(SyncPostsToCacheError::CacheError(_))));
    }
}
