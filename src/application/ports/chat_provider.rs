use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::entities::{ChatMessage, ModelProvider};

#[derive(Debug)]
pub enum ChatProviderError {
    NotConfigured(String),
    NetworkError(String),
    ApiError { status: u16, message: String },
    ParseError(String),
    StreamError(String),
}

impl std::fmt::Display for ChatProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatProviderError::NotConfigured(msg) => write!(f, "Provider not configured: {}", msg),
            ChatProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChatProviderError::ApiError { status, message } => {
                write!(f, "Upstream API error ({}): {}", status, message)
            }
            ChatProviderError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ChatProviderError::StreamError(msg) => write!(f, "Stream error: {}", msg),
        }
    }
}

impl std::error::Error for ChatProviderError {}

#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Text deltas in the order the upstream model produced them.
pub type TextDeltaStream = BoxStream<'static, Result<String, ChatProviderError>>;

#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn stream_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<TextDeltaStream, ChatProviderError>;

    fn provider(&self) -> ModelProvider;
}
