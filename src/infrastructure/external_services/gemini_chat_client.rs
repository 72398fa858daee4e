use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{Value, json};

use crate::application::ports::chat_provider::{
    ChatCompletionProvider, ChatCompletionRequest, ChatProviderError, TextDeltaStream,
};
use crate::domain::entities::{ChatMessage, ModelProvider};
use crate::infrastructure::config::GeminiConfig;
use crate::infrastructure::external_services::sse_stream::sse_data_stream;

/// Streams completions from `models/{model}:streamGenerateContent?alt=sse`.
pub struct GeminiChatClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiChatClient {
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }
}

fn gemini_role(message: &ChatMessage) -> &'static str {
    if message.is_user() { "user" } else { "model" }
}

pub fn build_request_body(request: &ChatCompletionRequest) -> Value {
    let mut contents: Vec<Value> = request
        .history
        .iter()
        .map(|message| {
            json!({
                "role": gemini_role(message),
                "parts": [{ "text": message.content }]
            })
        })
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": request.message }] }));

    json!({
        "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
        "contents": contents
    })
}

/// Text carried by one streamed `GenerateContentResponse` chunk.
pub fn parse_delta(payload: &str) -> Result<String, ChatProviderError> {
    let chunk: Value =
        serde_json::from_str(payload).map_err(|e| ChatProviderError::ParseError(e.to_string()))?;

    if let Some(error) = chunk.get("error") {
        return Err(ChatProviderError::ApiError {
            status: error.get("code").and_then(Value::as_u64).unwrap_or(500) as u16,
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown Gemini error")
                .to_string(),
        });
    }

    let text = chunk
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

#[async_trait]
impl ChatCompletionProvider for GeminiChatClient {
    async fn stream_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<TextDeltaStream, ChatProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ChatProviderError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;

        tracing::debug!("Streaming Gemini completion with {}", request.model);

        let response = self
            .client
            .post(self.stream_url(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&build_request_body(&request))
            .send()
            .await
            .map_err(|e| ChatProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read upstream error body: {}", e));
            tracing::error!("Gemini returned {}: {}", status, message);
            return Err(ChatProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let deltas = sse_data_stream(response.bytes_stream())
            .map(|payload| payload.and_then(|data| parse_delta(&data)));

        Ok(deltas.boxed())
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::Gemini
    }
}
