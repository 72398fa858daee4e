use pgvector::Vector;
use std::sync::Arc;

use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingTask,
};
use crate::domain::entities::KnowledgeMatch;
use crate::domain::repositories::KnowledgeChunkRepository;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const DEFAULT_MATCH_COUNT: i32 = 5;

#[derive(Debug)]
pub enum KnowledgeServiceError {
    EmbeddingError(String),
    RepositoryError(String),
}

impl std::fmt::Display for KnowledgeServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeServiceError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            KnowledgeServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for KnowledgeServiceError {}

pub struct KnowledgeService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    knowledge_chunk_repository: Arc<dyn KnowledgeChunkRepository>,
}

impl KnowledgeService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        knowledge_chunk_repository: Arc<dyn KnowledgeChunkRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            knowledge_chunk_repository,
        }
    }

    pub fn embedding_dimension(&self) -> usize {
        self.embedding_provider.embedding_dimension()
    }

    pub async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Vector, KnowledgeServiceError> {
        let request = EmbeddingRequest {
            text: text.to_string(),
            task,
        };

        self.embedding_provider
            .generate_embedding(request)
            .await
            .map(|response| response.embedding)
            .map_err(|e| KnowledgeServiceError::EmbeddingError(e.to_string()))
    }

    pub async fn search(
        &self,
        query: &str,
        similarity_threshold: f64,
        match_count: i32,
    ) -> Result<Vec<KnowledgeMatch>, KnowledgeServiceError> {
        let query_embedding = self.embed(query, EmbeddingTask::RetrievalQuery).await?;

        self.knowledge_chunk_repository
            .match_chunks(&query_embedding, similarity_threshold, match_count)
            .await
            .map_err(|e| KnowledgeServiceError::RepositoryError(e.to_string()))
    }

    /// Search used to ground a chat turn. Failures are logged and yield no excerpts.
    pub async fn search_best_effort(&self, query: &str) -> Vec<KnowledgeMatch> {
        match self
            .search(query, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_MATCH_COUNT)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!("Error searching knowledge chunks: {}", e);
                Vec::new()
            }
        }
    }
}
