use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, EmbeddingRequest, EmbeddingResponse,
};
use crate::infrastructure::config::GeminiConfig;

/// Output size of `text-embedding-004`; `knowledge_chunks.embedding` is `vector(768)`.
pub const EMBEDDING_DIMENSION: usize = 768;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: EmbedContent,
    pub task_type: &'static str,
}

#[derive(Serialize)]
pub struct EmbedContent {
    pub parts: Vec<EmbedPart>,
}

#[derive(Serialize)]
pub struct EmbedPart {
    pub text: String,
}

#[derive(Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Deserialize)]
pub struct ContentEmbedding {
    pub values: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingClientConfig {
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for EmbeddingClientConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug)]
enum AttemptError {
    /// Worth another attempt: transport failures, 429 and 5xx.
    Retryable(EmbeddingProviderError),
    Fatal(EmbeddingProviderError),
}

pub struct GeminiEmbeddingClient {
    client: Client,
    gemini: GeminiConfig,
    config: EmbeddingClientConfig,
}

impl GeminiEmbeddingClient {
    pub fn new(gemini: GeminiConfig, config: EmbeddingClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            gemini,
            config,
        })
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent",
            self.gemini.api_base.trim_end_matches('/'),
            self.gemini.embedding_model
        )
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis((self.config.backoff_factor.powi(attempt as i32 - 1) * 1000.0) as u64)
    }

    async fn send_request(
        &self,
        api_key: &str,
        request: &EmbedContentRequest,
    ) -> Result<Vec<f32>, EmbeddingProviderError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(api_key, request).await {
                Ok(values) => return Ok(values),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(e)) => {
                    if attempts > self.config.max_retries {
                        tracing::error!("Embedding request failed after {} attempts: {}", attempts, e);
                        return Err(e);
                    }

                    let backoff_time = self.backoff(attempts);
                    tracing::warn!(
                        "Embedding attempt {} failed ({}), retrying in {:?}",
                        attempts,
                        e,
                        backoff_time
                    );
                    tokio::time::sleep(backoff_time).await;
                }
            }
        }
    }

    async fn execute_request(
        &self,
        api_key: &str,
        request: &EmbedContentRequest,
    ) -> Result<Vec<f32>, AttemptError> {
        let response = self
            .client
            .post(self.embed_url())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                AttemptError::Retryable(EmbeddingProviderError::NetworkError(
                    e.without_url().to_string(),
                ))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Retryable(EmbeddingProviderError::RateLimitExceeded));
        }
        if status.is_server_error() {
            return Err(AttemptError::Retryable(EmbeddingProviderError::ServiceUnavailable));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Fatal(EmbeddingProviderError::ApiError(format!(
                "{}: {}",
                status, body
            ))));
        }

        let parsed = response
            .json::<EmbedContentResponse>()
            .await
            .map_err(|e| AttemptError::Fatal(EmbeddingProviderError::ApiError(e.to_string())))?;

        Ok(parsed.embedding.values)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingClient {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        let api_key = self
            .gemini
            .api_key
            .as_deref()
            .ok_or_else(|| EmbeddingProviderError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;

        let text = request.text.trim();
        if text.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput("Text cannot be empty".to_string()));
        }
        let text: String = text.chars().take(self.max_input_length()).collect();

        let body = EmbedContentRequest {
            model: format!("models/{}", self.gemini.embedding_model),
            content: EmbedContent {
                parts: vec![EmbedPart { text }],
            },
            task_type: request.task.as_api_str(),
        };

        let values = self.send_request(api_key, &body).await?;
        if values.is_empty() {
            return Err(EmbeddingProviderError::ApiError(
                "No embedding returned".to_string(),
            ));
        }

        Ok(EmbeddingResponse {
            embedding: Vector::from(values),
            model_name: self.gemini.embedding_model.clone(),
        })
    }

    fn model_name(&self) -> &str {
        &self.gemini.embedding_model
    }

    fn max_input_length(&self) -> usize {
        8192
    }

    fn embedding_dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::embedding_provider::EmbeddingTask;

    fn gemini_config(api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.map(str::to_string),
            api_base: "https://generativelanguage.googleapis.com/".to_string(),
            embedding_model: "text-embedding-004".to_string(),
        }
    }

    #[test]
    fn test_request_serialization() {
        let request = EmbedContentRequest {
            model: "models/text-embedding-004".to_string(),
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: "Hello".to_string(),
                }],
            },
            task_type: EmbeddingTask::RetrievalQuery.as_api_str(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["taskType"], "RETRIEVAL_QUERY");
        assert_eq!(value["content"]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn test_url_and_backoff() {
        let client = GeminiEmbeddingClient::new(gemini_config(Some("k")), EmbeddingClientConfig::default()).unwrap();

        assert_eq!(
            client.embed_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/text-embedding-004:embedContent"
        );
        assert_eq!(client.backoff(1), Duration::from_millis(1000));
        assert_eq!(client.backoff(2), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = GeminiEmbeddingClient::new(gemini_config(None), EmbeddingClientConfig::default()).unwrap();
        let result = client
            .generate_embedding(EmbeddingRequest {
                text: "hello".to_string(),
                task: EmbeddingTask::RetrievalQuery,
            })
            .await;

        assert!(matches!(result, Err(EmbeddingProviderError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let client = GeminiEmbeddingClient::new(gemini_config(Some("k")), EmbeddingClientConfig::default()).unwrap();
        let result = client
            .generate_embedding(EmbeddingRequest {
                text: "   ".to_string(),
                task: EmbeddingTask::RetrievalDocument,
            })
            .await;

        assert!(matches!(result, Err(EmbeddingProviderError::InvalidInput(_))));
    }

    #[test]
    fn test_response_parsing() {
        let parsed: EmbedContentResponse =
            serde_json::from_str(r#"{"embedding":{"values":[0.1,0.2,0.3]}}"#).unwrap();
        assert_eq!(parsed.embedding.values.len(), 3);
    }
}
