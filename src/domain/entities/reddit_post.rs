use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored forum post: the post and its comment tree kept as one opaque JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i32>,
    post_id: String,
    created_at: DateTime<Utc>,
    author: String,
    data: Value,
}

impl RedditPost {
    pub fn new(post_id: String, created_at: DateTime<Utc>, author: String, data: Value) -> Self {
        Self {
            id: None,
            post_id,
            created_at,
            author,
            data,
        }
    }

    pub fn restore(
        id: i32,
        post_id: String,
        created_at: DateTime<Utc>,
        author: String,
        data: Value,
    ) -> Self {
        Self {
            id: Some(id),
            post_id,
            created_at,
            author,
            data,
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Looks a post field up in either stored shape: the raw listing shape
    /// keeps it under `data.post`, the normalised shape at the top level.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data
            .get("post")
            .and_then(|post| post.get(name))
            .or_else(|| self.data.get(name))
    }

    pub fn comments(&self) -> Option<&Value> {
        self.data.get("comments")
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title")
            .or_else(|| self.data.get("postTitle"))
            .and_then(Value::as_str)
    }

    pub fn top_level_comment_count(&self) -> usize {
        self.comments()
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
