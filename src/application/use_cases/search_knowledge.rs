use std::sync::Arc;

use crate::application::services::KnowledgeService;
use crate::application::services::knowledge_service::{
    DEFAULT_MATCH_COUNT, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::domain::entities::KnowledgeMatch;

const MAX_MATCH_COUNT: i32 = 50;

#[derive(Debug)]
pub enum SearchKnowledgeError {
    ValidationError(String),
    SearchError(String),
}

impl std::fmt::Display for SearchKnowledgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKnowledgeError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchKnowledgeError::SearchError(msg) => write!(f, "Search error: {}", msg),
        }
    }
}

impl std::error::Error for SearchKnowledgeError {}

#[derive(Debug, Clone)]
pub struct SearchKnowledgeRequest {
    pub query: String,
    pub similarity_threshold: Option<f64>,
    pub match_count: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SearchKnowledgeResponse {
    pub query: String,
    pub results: Vec<KnowledgeMatch>,
    pub search_time_ms: u64,
}

pub struct SearchKnowledgeUseCase {
    knowledge_service: Arc<KnowledgeService>,
}

impl SearchKnowledgeUseCase {
    pub fn new(knowledge_service: Arc<KnowledgeService>) -> Self {
        Self { knowledge_service }
    }

    pub async fn execute(&self, request: SearchKnowledgeRequest) -> Result<SearchKnowledgeResponse, SearchKnowledgeError> {
        let start_time = std::time::Instant::now();

        let query = request.query.trim();
        if query.is_empty() {
            return Err(SearchKnowledgeError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let match_count = request.match_count.unwrap_or(DEFAULT_MATCH_COUNT);
        if !(1..=MAX_MATCH_COUNT).contains(&match_count) {
            return Err(SearchKnowledgeError::ValidationError(format!(
                "Match count must be between 1 and {}",
                MAX_MATCH_COUNT
            )));
        }

        let threshold = request
            .similarity_threshold
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SearchKnowledgeError::ValidationError(
                "Similarity threshold must be between 0 and 1".to_string(),
            ));
        }

        let results = self
            .knowledge_service
            .search(query, threshold, match_count)
            .await
            .map_err(|e| SearchKnowledgeError::SearchError(e.to_string()))?;

        Ok(SearchKnowledgeResponse {
            query: query.to_string(),
            results,
            search_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeEmbeddingProvider, FakeKnowledgeChunkRepository};
    use crate::domain::entities::KnowledgeChunk;
    use pgvector::Vector;

    fn use_case(provider: FakeEmbeddingProvider) -> SearchKnowledgeUseCase {
        let repository = Arc::new(FakeKnowledgeChunkRepository::default());
        for (content, embedding) in [
            ("exact", vec![1.0, 0.0]),
            ("close", vec![0.9, 0.1]),
            ("orthogonal", vec![0.0, 1.0]),
        ] {
            repository.insert(KnowledgeChunk::new(
                content.to_string(),
                None,
                None,
                Some(Vector::from(embedding)),
            ));
        }
        SearchKnowledgeUseCase::new(Arc::new(KnowledgeService::new(Arc::new(provider), repository)))
    }

    fn request(query: &str, threshold: Option<f64>, count: Option<i32>) -> SearchKnowledgeRequest {
        SearchKnowledgeRequest {
            query: query.to_string(),
            similarity_threshold: threshold,
            match_count: count,
        }
    }

    #[tokio::test]
    async fn test_returns_matches_above_threshold_best_first() {
        let response = use_case(FakeEmbeddingProvider::returning(vec![1.0, 0.0]))
            .execute(request("  zakat on savings  ", None, None))
            .await
            .unwrap();

        assert_eq!(response.query, "zakat on savings");
        let contents: Vec<&str> = response.results.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["exact", "close"]);
    }

    #[tokio::test]
    async fn test_match_count_limits_results() {
        let response = use_case(FakeEmbeddingProvider::returning(vec![1.0, 0.0]))
            .execute(request("q", Some(0.0), Some(1)))
            .await
            .unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_validation() {
        let use_case = use_case(FakeEmbeddingProvider::returning(vec![1.0, 0.0]));

        for bad in [
            request(" ", None, None),
            request("q", None, Some(0)),
            request("q", None, Some(51)),
            request("q", Some(-0.1), None),
            request("q", Some(1.5), None),
        ] {
            assert!(matches!(
                use_case.execute(bad).await,
                Err(SearchKnowledgeError::ValidationError(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_embedding_failure() {
        let result = use_case(FakeEmbeddingProvider::failing())
            .execute(request("q", None, None))
            .await;
        assert!(matches!(result, Err(SearchKnowledgeError::SearchError(_))));
    }
}
