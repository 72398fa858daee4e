use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    id: Option<i32>,
    content: String,
    source: Option<String>,
    metadata: Option<serde_json::Value>,
    #[serde(skip_serializing)]
    embedding: Option<Vector>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl KnowledgeChunk {
    pub fn new(
        content: String,
        source: Option<String>,
        metadata: Option<serde_json::Value>,
        embedding: Option<Vector>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            content,
            source,
            metadata,
            embedding,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(
        id: i32,
        content: String,
        source: Option<String>,
        metadata: Option<serde_json::Value>,
        embedding: Option<Vector>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            content,
            source,
            metadata,
            embedding,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    pub fn embedding(&self) -> Option<&Vector> {
        self.embedding.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.embedding.as_ref().map(|v| v.as_slice().len())
    }

    pub fn attach_embedding(&mut self, embedding: Vector) {
        self.embedding = Some(embedding);
        self.updated_at = Utc::now();
    }
}

/// A row returned by the database-side `match_chunks` function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeMatch {
    pub id: i32,
    pub content: String,
    pub source: Option<String>,
    pub metadata: serde_json::Value,
    pub similarity: f64,
}
