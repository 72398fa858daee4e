use serde::{Deserialize, Serialize};

use crate::application::services::prompt::PromptKind;
use crate::application::use_cases::stream_chat::StreamChatRequest;
use crate::domain::entities::chat_model::{DEFAULT_MODEL_NAME, MODELS};
use crate::domain::entities::{ChatMessage, ChatModel, ModelProvider};

pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "How can I start saving/investing with a limited income in Pakistan",
    "What are the best investment options in Pakistan for beginners?",
    "How much money do I need to retire early in Pakistan?",
    "Is it better to invest in real estate, stocks, or mutual funds in Pakistan?",
    "How can I minimize taxes on my investments in Pakistan?",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestDto {
    /// Conversation id chosen by the client; only logged.
    pub id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub model_id: Option<String>,
    #[serde(default)]
    pub prompt: PromptKind,
}

impl From<ChatRequestDto> for StreamChatRequest {
    fn from(dto: ChatRequestDto) -> Self {
        Self {
            messages: dto.messages,
            model_id: dto
                .model_id
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            prompt: dto.prompt,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDto {
    pub id: &'static str,
    pub label: &'static str,
    pub api_identifier: &'static str,
    pub description: &'static str,
    pub provider: ModelProvider,
}

impl From<&ChatModel> for ModelDto {
    fn from(model: &ChatModel) -> Self {
        Self {
            id: model.id,
            label: model.label,
            api_identifier: model.api_identifier,
            description: model.description,
            provider: model.provider(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponseDto {
    pub models: Vec<ModelDto>,
    pub default_model: &'static str,
}

impl ModelsResponseDto {
    pub fn catalog() -> Self {
        Self {
            models: MODELS.iter().map(ModelDto::from).collect(),
            default_model: DEFAULT_MODEL_NAME,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestedQuestionsResponseDto {
    pub questions: Vec<&'static str>,
}

impl Default for SuggestedQuestionsResponseDto {
    fn default() -> Self {
        Self {
            questions: SUGGESTED_QUESTIONS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let dto: ChatRequestDto = serde_json::from_value(serde_json::json!({
            "messages": [{ "role": "user", "content": "Hi" }]
        }))
        .unwrap();

        let request = StreamChatRequest::from(dto);
        assert_eq!(request.model_id, DEFAULT_MODEL_NAME);
        assert_eq!(request.prompt, PromptKind::Regular);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_chat_request_reads_camel_case() {
        let dto: ChatRequestDto = serde_json::from_value(serde_json::json!({
            "id": "chat-1",
            "messages": [],
            "modelId": "gpt-4o",
            "prompt": "portfolio-reviewer"
        }))
        .unwrap();

        assert_eq!(dto.id.as_deref(), Some("chat-1"));
        assert_eq!(dto.model_id.as_deref(), Some("gpt-4o"));
        assert_eq!(dto.prompt, PromptKind::PortfolioReviewer);
    }

    #[test]
    fn test_catalog_lists_providers() {
        let value = serde_json::to_value(ModelsResponseDto::catalog()).unwrap();

        assert_eq!(value["defaultModel"], "gemini-2.0-flash");
        assert_eq!(value["models"].as_array().unwrap().len(), 4);
        assert_eq!(value["models"][2]["provider"], "openai");
    }
}
