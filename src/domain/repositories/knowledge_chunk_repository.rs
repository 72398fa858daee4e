use async_trait::async_trait;
use pgvector::Vector;

use crate::domain::entities::{KnowledgeChunk, KnowledgeMatch};

#[derive(Debug)]
pub enum KnowledgeChunkRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for KnowledgeChunkRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeChunkRepositoryError::DatabaseError(msg) => {
                write!(f, "Database error: {}", msg)
            }
            KnowledgeChunkRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for KnowledgeChunkRepositoryError {}

#[async_trait]
pub trait KnowledgeChunkRepository: Send + Sync {
    async fn save(
        &self,
        chunk: &KnowledgeChunk,
    ) -> Result<KnowledgeChunk, KnowledgeChunkRepositoryError>;
    /// Chunks whose cosine similarity to `query_embedding` is above
    /// `similarity_threshold`, best match first, at most `match_count`.
    async fn match_chunks(
        &self,
        query_embedding: &Vector,
        similarity_threshold: f64,
        match_count: i32,
    ) -> Result<Vec<KnowledgeMatch>, KnowledgeChunkRepositoryError>;
}
