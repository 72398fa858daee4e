use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::domain::entities::RedditPost;
use crate::domain::repositories::{
    RedditPostRepository, reddit_post_repository::RedditPostRepositoryError,
};

static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Valid field name pattern"));

const INVALID_QUERY: &str =
    "Invalid query parameters. For field queries, include \"fields\" parameter.";

#[derive(Debug)]
pub enum QueryRedditPostError {
    MissingPostId,
    InvalidQuery(String),
    NotFound(String),
    RepositoryError(String),
}

impl std::fmt::Display for QueryRedditPostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryRedditPostError::MissingPostId => write!(f, "Post ID is required"),
            QueryRedditPostError::InvalidQuery(msg) => write!(f, "{}", msg),
            QueryRedditPostError::NotFound(_) => write!(f, "Reddit post not found"),
            QueryRedditPostError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for QueryRedditPostError {}

impl From<RedditPostRepositoryError> for QueryRedditPostError {
    fn from(error: RedditPostRepositoryError) -> Self {
        QueryRedditPostError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryRedditPostRequest {
    pub post_id: Option<String>,
    pub query_type: Option<String>,
    pub fields: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum PostProjection {
    Comments,
    Fields(Vec<String>),
}

impl PostProjection {
    fn parse(query_type: Option<&str>, fields: Option<&str>) -> Result<Self, QueryRedditPostError> {
        match query_type.unwrap_or("fields") {
            "comments" => Ok(PostProjection::Comments),
            "fields" => {
                let names: Vec<String> = fields
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();

                if names.is_empty() {
                    return Err(QueryRedditPostError::InvalidQuery(INVALID_QUERY.to_string()));
                }
                if let Some(bad) = names.iter().find(|name| !FIELD_NAME.is_match(name)) {
                    return Err(QueryRedditPostError::InvalidQuery(format!(
                        "Invalid field name: {}",
                        bad
                    )));
                }
                Ok(PostProjection::Fields(names))
            }
            _ => Err(QueryRedditPostError::InvalidQuery(INVALID_QUERY.to_string())),
        }
    }

    fn project(&self, post: &RedditPost) -> Value {
        match self {
            PostProjection::Comments => {
                json!({ "comments": post.comments().cloned().unwrap_or(Value::Null) })
            }
            PostProjection::Fields(names) => {
                let mut projected = Map::new();
                projected.insert("id".to_string(), json!(post.id()));
                projected.insert("post_id".to_string(), json!(post.post_id()));
                for name in names {
                    projected.insert(
                        name.clone(),
                        post.field(name).cloned().unwrap_or(Value::Null),
                    );
                }
                Value::Object(projected)
            }
        }
    }
}

/// Projects a stored post down to its comments or a caller-chosen set of fields.
pub struct QueryRedditPostUseCase {
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl QueryRedditPostUseCase {
    pub fn new(reddit_post_repository: Arc<dyn RedditPostRepository>) -> Self {
        Self {
            reddit_post_repository,
        }
    }

    pub async fn execute(&self, request: QueryRedditPostRequest) -> Result<Value, QueryRedditPostError> {
        let post_id = request
            .post_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(QueryRedditPostError::MissingPostId)?;

        // Validate before touching the database.
        let projection =
            PostProjection::parse(request.query_type.as_deref(), request.fields.as_deref())?;

        let post = self
            .reddit_post_repository
            .find_by_post_id(post_id)
            .await?
            .ok_or_else(|| QueryRedditPostError::NotFound(post_id.to_string()))?;

        Ok(projection.project(&post))
    }
}
