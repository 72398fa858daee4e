use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::future::ready;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::ChatCompletionProvider;
use crate::application::ports::chat_provider::ChatCompletionRequest;
use crate::application::services::prompt::{PromptKind, build_system_prompt};
use crate::application::services::{KnowledgeService, PostContextService};
use crate::domain::entities::chat_model::find_model;
use crate::domain::entities::{ChatMessage, Conversation, ModelProvider};
use crate::domain::value_objects::ChatStreamEvent;

#[derive(Debug)]
pub enum StreamChatError {
    ModelNotFound(String),
    NoUserMessage,
    ProviderUnavailable(ModelProvider),
}

impl std::fmt::Display for StreamChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamChatError::ModelNotFound(_) => write!(f, "Model not found"),
            StreamChatError::NoUserMessage => write!(f, "No user message found"),
            StreamChatError::ProviderUnavailable(provider) => {
                write!(f, "No chat provider registered for {:?}", provider)
            }
        }
    }
}

impl std::error::Error for StreamChatError {}

#[derive(Debug, Clone)]
pub struct StreamChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model_id: String,
    pub prompt: PromptKind,
}

/// Events in wire order: the user message id first, then text deltas,
/// ending early after at most one error.
pub type ChatEventStream = BoxStream<'static, ChatStreamEvent>;

pub struct StreamChatUseCase {
    providers: HashMap<ModelProvider, Arc<dyn ChatCompletionProvider>>,
    post_context_service: Arc<PostContextService>,
    knowledge_service: Arc<KnowledgeService>,
    knowledge_retrieval_enabled: bool,
}

impl StreamChatUseCase {
    pub fn new(
        providers: Vec<Arc<dyn ChatCompletionProvider>>,
        post_context_service: Arc<PostContextService>,
        knowledge_service: Arc<KnowledgeService>,
        knowledge_retrieval_enabled: bool,
    ) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| (provider.provider(), provider))
            .collect();

        Self {
            providers,
            post_context_service,
            knowledge_service,
            knowledge_retrieval_enabled,
        }
    }

    pub async fn execute(&self, request: StreamChatRequest) -> Result<ChatEventStream, StreamChatError> {
        let model = find_model(&request.model_id)
            .ok_or_else(|| StreamChatError::ModelNotFound(request.model_id.clone()))?;

        let conversation =
            Conversation::from_messages(&request.messages).ok_or(StreamChatError::NoUserMessage)?;

        let provider = self
            .providers
            .get(&model.provider())
            .cloned()
            .ok_or(StreamChatError::ProviderUnavailable(model.provider()))?;

        let posts_context = self.post_context_service.load_context().await;
        tracing::debug!("Loaded {} posts as chat context", posts_context.len());

        let knowledge = if self.knowledge_retrieval_enabled {
            self.knowledge_service
                .search_best_effort(&conversation.latest_user_message.content)
                .await
        } else {
            Vec::new()
        };

        let completion_request = ChatCompletionRequest {
            model: model.api_identifier.to_string(),
            system_prompt: build_system_prompt(request.prompt, &posts_context, &knowledge),
            history: conversation.history,
            message: conversation.latest_user_message.content,
        };

        let user_message_id = Uuid::new_v4().to_string();
        let head = stream::once(ready(ChatStreamEvent::UserMessageId(user_message_id)));

        let body = stream::once(async move { provider.stream_completion(completion_request).await })
            .flat_map(|started| match started {
                Ok(deltas) => deltas
                    .map(|delta| match delta {
                        Ok(text) => ChatStreamEvent::Text(text),
                        Err(e) => ChatStreamEvent::Error(e.to_string()),
                    })
                    .boxed(),
                Err(e) => stream::once(ready(ChatStreamEvent::Error(e.to_string()))).boxed(),
            })
            .filter(|event| ready(!matches!(event, ChatStreamEvent::Text(text) if text.is_empty())))
            .scan(false, |errored, event| {
                if *errored {
                    return ready(None);
                }
                *errored = event.is_error();
                ready(Some(event))
            });

        Ok(head.chain(body).boxed())
    }
}
