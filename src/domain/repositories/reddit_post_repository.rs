use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::RedditPost;

#[derive(Debug)]
pub enum RedditPostRepositoryError {
    DuplicatePostId(String),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for RedditPostRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedditPostRepositoryError::DuplicatePostId(id) => {
                write!(f, "Reddit post already stored: {}", id)
            }
            RedditPostRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            RedditPostRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for RedditPostRepositoryError {}

#[async_trait]
pub trait RedditPostRepository: Send + Sync {
    /// Inserts one post and returns the stored row.
    async fn save(&self, post: &RedditPost) -> Result<RedditPost, RedditPostRepositoryError>;
    /// Inserts many posts in one statement. Rows whose `post_id` already
    /// exists are skipped; only the rows actually written are returned.
    async fn save_batch(
        &self,
        posts: &[RedditPost],
    ) -> Result<Vec<RedditPost>, RedditPostRepositoryError>;
    async fn find_by_post_id(
        &self,
        post_id: &str,
    ) -> Result<Option<RedditPost>, RedditPostRepositoryError>;
    /// All posts, newest `created_at` first.
    async fn find_all(&self) -> Result<Vec<RedditPost>, RedditPostRepositoryError>;
    /// Only the `data` column of every post.
    async fn find_all_data(&self) -> Result<Vec<Value>, RedditPostRepositoryError>;
}
