use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{Value, json};
use std::future::ready;

use crate::application::ports::chat_provider::{
    ChatCompletionProvider, ChatCompletionRequest, ChatProviderError, TextDeltaStream,
};
use crate::domain::entities::{ChatMessage, ModelProvider};
use crate::infrastructure::config::OpenAiConfig;
use crate::infrastructure::external_services::sse_stream::sse_data_stream;

const DONE_SENTINEL: &str = "[DONE]";

pub struct OpenAiChatClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiChatClient {
    pub fn new(client: Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

fn openai_role(message: &ChatMessage) -> &'static str {
    if message.is_user() { "user" } else { "assistant" }
}

pub fn build_request_body(request: &ChatCompletionRequest) -> Value {
    let mut messages = vec![json!({ "role": "system", "content": request.system_prompt })];
    messages.extend(request.history.iter().map(|message| {
        json!({ "role": openai_role(message), "content": message.content })
    }));
    messages.push(json!({ "role": "user", "content": request.message }));

    json!({
        "model": request.model,
        "stream": true,
        "messages": messages
    })
}

/// Content delta of one `chat.completion.chunk`.
pub fn parse_delta(payload: &str) -> Result<String, ChatProviderError> {
    let chunk: Value =
        serde_json::from_str(payload).map_err(|e| ChatProviderError::ParseError(e.to_string()))?;

    if let Some(error) = chunk.get("error") {
        return Err(ChatProviderError::ApiError {
            status: 500,
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown OpenAI error")
                .to_string(),
        });
    }

    Ok(chunk
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

#[async_trait]
impl ChatCompletionProvider for OpenAiChatClient {
    async fn stream_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<TextDeltaStream, ChatProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ChatProviderError::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        tracing::debug!("Streaming OpenAI completion with {}", request.model);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
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
            tracing::error!("OpenAI returned {}: {}", status, message);
            return Err(ChatProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let deltas = sse_data_stream(response.bytes_stream())
            .take_while(|payload| ready(!matches!(payload, Ok(data) if data.trim() == DONE_SENTINEL)))
            .map(|payload| payload.and_then(|data| parse_delta(&data)));

        Ok(deltas.boxed())
    }

    fn provider(&self) -> ModelProvider {
        ModelProvider::OpenAi
    }
}
