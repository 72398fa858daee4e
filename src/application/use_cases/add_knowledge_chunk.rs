use pgvector::Vector;
use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::embedding_provider::EmbeddingTask;
use crate::application::services::KnowledgeService;
use crate::domain::entities::KnowledgeChunk;
use crate::domain::repositories::KnowledgeChunkRepository;

#[derive(Debug)]
pub enum AddKnowledgeChunkError {
    ValidationError(String),
    EmbeddingError(String),
    RepositoryError(String),
}

impl std::fmt::Display for AddKnowledgeChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddKnowledgeChunkError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AddKnowledgeChunkError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            AddKnowledgeChunkError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for AddKnowledgeChunkError {}

#[derive(Debug, Clone)]
pub struct AddKnowledgeChunkRequest {
    pub content: String,
    pub source: Option<String>,
    pub metadata: Option<Value>,
    pub embedding: Option<Vec<f32>>,
}

pub struct AddKnowledgeChunkUseCase {
    knowledge_service: Arc<KnowledgeService>,
    knowledge_chunk_repository: Arc<dyn KnowledgeChunkRepository>,
}

impl AddKnowledgeChunkUseCase {
    pub fn new(
        knowledge_service: Arc<KnowledgeService>,
        knowledge_chunk_repository: Arc<dyn KnowledgeChunkRepository>,
    ) -> Self {
        Self {
            knowledge_service,
            knowledge_chunk_repository,
        }
    }

    pub async fn execute(&self, request: AddKnowledgeChunkRequest) -> Result<KnowledgeChunk, AddKnowledgeChunkError> {
        if request.content.trim().is_empty() {
            return Err(AddKnowledgeChunkError::ValidationError(
                "Content cannot be empty".to_string(),
            ));
        }

        if let Some(metadata) = &request.metadata {
            if !metadata.is_object() {
                return Err(AddKnowledgeChunkError::ValidationError(
                    "Metadata must be a JSON object".to_string(),
                ));
            }
        }

        let embedding = match request.embedding {
            Some(values) => {
                let expected = self.knowledge_service.embedding_dimension();
                if values.len() != expected {
                    return Err(AddKnowledgeChunkError::ValidationError(format!(
                        "Embedding must have {} dimensions, got {}",
                        expected,
                        values.len()
                    )));
                }
                Vector::from(values)
            }
            None => self
                .knowledge_service
                .embed(&request.content, EmbeddingTask::RetrievalDocument)
                .await
                .map_err(|e| AddKnowledgeChunkError::EmbeddingError(e.to_string()))?,
        };

        let chunk = KnowledgeChunk::new(
            request.content,
            request.source,
            request.metadata,
            Some(embedding),
        );

        let saved = self
            .knowledge_chunk_repository
            .save(&chunk)
            .await
            .map_err(|e| AddKnowledgeChunkError::RepositoryError(e.to_string()))?;

        tracing::info!("Stored knowledge chunk {:?}", saved.id());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeEmbeddingProvider, FakeKnowledgeChunkRepository};
    use serde_json::json;

    fn use_case(
        provider: FakeEmbeddingProvider,
        repository: Arc<FakeKnowledgeChunkRepository>,
    ) -> AddKnowledgeChunkUseCase {
        let service = Arc::new(KnowledgeService::new(Arc::new(provider), repository.clone()));
        AddKnowledgeChunkUseCase::new(service, repository)
    }

    fn request(content: &str, embedding: Option<Vec<f32>>) -> AddKnowledgeChunkRequest {
        AddKnowledgeChunkRequest {
            content: content.to_string(),
            source: Some("faq".to_string()),
            metadata: Some(json!({ "topic": "tax" })),
            embedding,
        }
    }

    #[tokio::test]
    async fn test_embeds_content_when_no_embedding_supplied() {
        let repository = Arc::new(FakeKnowledgeChunkRepository::default());
        let chunk = use_case(FakeEmbeddingProvider::returning(vec![0.5, 0.5, 0.0]), repository.clone())
            .execute(request("Filer vs non-filer tax rates", None))
            .await
            .unwrap();

        assert_eq!(chunk.id(), Some(1));
        assert_eq!(chunk.dimension(), Some(3));
        assert_eq!(chunk.source(), Some("faq"));
        assert_eq!(repository.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_supplied_embedding_skips_provider() {
        let repository = Arc::new(FakeKnowledgeChunkRepository::default());
        let chunk = use_case(FakeEmbeddingProvider::returning(vec![0.0, 0.0]), repository)
            .execute(request("Roshan Digital Accounts", Some(vec![0.1, 0.9])))
            .await
            .unwrap();

        assert_eq!(chunk.embedding().unwrap().as_slice(), &[0.1, 0.9]);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let result = use_case(
            FakeEmbeddingProvider::returning(vec![0.0, 0.0]),
            Arc::new(FakeKnowledgeChunkRepository::default()),
        )
        .execute(request("content", Some(vec![1.0, 2.0, 3.0])))
        .await;

        assert!(matches!(result, Err(AddKnowledgeChunkError::ValidationError(msg)) if msg.contains("2 dimensions")));
    }

    #[tokio::test]
    async fn test_empty_content_and_bad_metadata() {
        let use_case = use_case(
            FakeEmbeddingProvider::returning(vec![1.0]),
            Arc::new(FakeKnowledgeChunkRepository::default()),
        );

        assert!(matches!(
            use_case.execute(request("   ", None)).await,
            Err(AddKnowledgeChunkError::ValidationError(_))
        ));

        let mut bad_metadata = request("content", None);
        bad_metadata.metadata = Some(json!(["not", "an", "object"]));
        assert!(matches!(
            use_case.execute(bad_metadata).await,
            Err(AddKnowledgeChunkError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_embedding_failure() {
        let result = use_case(
            FakeEmbeddingProvider::failing(),
            Arc::new(FakeKnowledgeChunkRepository::default()),
        )
        .execute(request("content", None))
        .await;

        assert!(matches!(result, Err(AddKnowledgeChunkError::EmbeddingError(_))));
    }
}
