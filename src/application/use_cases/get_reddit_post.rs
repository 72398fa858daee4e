use std::sync::Arc;

use crate::domain::entities::RedditPost;
use crate::domain::repositories::{
    RedditPostRepository, reddit_post_repository::RedditPostRepositoryError,
};

#[derive(Debug)]
pub enum GetRedditPostError {
    NotFound(String),
    ValidationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for GetRedditPostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetRedditPostError::NotFound(_) => write!(f, "Reddit post not found"),
            GetRedditPostError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            GetRedditPostError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetRedditPostError {}

impl From<RedditPostRepositoryError> for GetRedditPostError {
    fn from(error: RedditPostRepositoryError) -> Self {
        GetRedditPostError::RepositoryError(error.to_string())
    }
}

pub struct GetRedditPostUseCase {
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl GetRedditPostUseCase {
    pub fn new(reddit_post_repository: Arc<dyn RedditPostRepository>) -> Self {
        Self {
            reddit_post_repository,
        }
    }

    pub async fn execute(&self, post_id: &str) -> Result<RedditPost, GetRedditPostError> {
        let post_id = post_id.trim();
        if post_id.is_empty() {
            return Err(GetRedditPostError::ValidationError(
                "Post ID cannot be empty".to_string(),
            ));
        }

        self.reddit_post_repository
            .find_by_post_id(post_id)
            .await?
            .ok_or_else(|| GetRedditPostError::NotFound(post_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeRedditPostRepository, sample_post};

    fn use_case() -> GetRedditPostUseCase {
        GetRedditPostUseCase::new(Arc::new(FakeRedditPostRepository::with_posts(vec![
            sample_post("abc"),
        ])))
    }

    #[tokio::test]
    async fn test_finds_existing_post() {
        let post = use_case().execute("abc").await.unwrap();
        assert_eq!(post.post_id(), "abc");
        assert!(post.is_persisted());
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let result = use_case().execute("zzz").await;
        assert!(matches!(result, Err(GetRedditPostError::NotFound(id)) if id == "zzz"));
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected() {
        let result = use_case().execute("  ").await;
        assert!(matches!(result, Err(GetRedditPostError::ValidationError(_))));
    }
}
