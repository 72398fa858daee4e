use serde_json::Value;
use std::sync::Arc;

use crate::application::services::reddit_normalizer::from_listing_pair;
use crate::domain::entities::RedditPost;
use crate::domain::repositories::{
    RedditPostRepository, reddit_post_repository::RedditPostRepositoryError,
};

#[derive(Debug)]
pub enum StoreRedditPostError {
    InvalidFormat,
    DuplicatePost(String),
    RepositoryError(String),
}

impl std::fmt::Display for StoreRedditPostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreRedditPostError::InvalidFormat => write!(f, "Invalid Reddit post data format"),
            StoreRedditPostError::DuplicatePost(post_id) => {
                write!(f, "Reddit post {} is already stored", post_id)
            }
            StoreRedditPostError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for StoreRedditPostError {}

impl From<RedditPostRepositoryError> for StoreRedditPostError {
    fn from(error: RedditPostRepositoryError) -> Self {
        match error {
            RedditPostRepositoryError::DuplicatePostId(post_id) => {
                StoreRedditPostError::DuplicatePost(post_id)
            }
            other => StoreRedditPostError::RepositoryError(other.to_string()),
        }
    }
}

/// Stores one post from the body of a `.json` permalink fetch:
/// `[post listing, comments listing]`.
pub struct StoreRedditPostUseCase {
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl StoreRedditPostUseCase {
    pub fn new(reddit_post_repository: Arc<dyn RedditPostRepository>) -> Self {
        Self {
            reddit_post_repository,
        }
    }

    pub async fn execute(&self, payload: &Value) -> Result<RedditPost, StoreRedditPostError> {
        let listings = payload.as_array().ok_or(StoreRedditPostError::InvalidFormat)?;
        let post_listing = listings.first().ok_or(StoreRedditPostError::InvalidFormat)?;

        let post = from_listing_pair(post_listing, listings.get(1))
            .ok_or(StoreRedditPostError::InvalidFormat)?;

        let stored = self.reddit_post_repository.save(&post).await?;
        tracing::info!("Stored Reddit post {}", stored.post_id());

        Ok(stored)
    }
}
