use std::sync::Arc;

use crate::domain::entities::RedditPost;
use crate::domain::repositories::{
    RedditPostRepository, reddit_post_repository::RedditPostRepositoryError,
};

#[derive(Debug)]
pub enum ListRedditPostsError {
    RepositoryError(String),
}

impl std::fmt::Display for ListRedditPostsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListRedditPostsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ListRedditPostsError {}

impl From<RedditPostRepositoryError> for ListRedditPostsError {
    fn from(error: RedditPostRepositoryError) -> Self {
        ListRedditPostsError::RepositoryError(error.to_string())
    }
}

pub struct ListRedditPostsUseCase {
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl ListRedditPostsUseCase {
    pub fn new(reddit_post_repository: Arc<dyn RedditPostRepository>) -> Self {
        Self {
            reddit_post_repository,
        }
    }

    /// Newest first.
    pub async fn execute(&self) -> Result<Vec<RedditPost>, ListRedditPostsError> {
        Ok(self.reddit_post_repository.find_all().await?)
    }
}
