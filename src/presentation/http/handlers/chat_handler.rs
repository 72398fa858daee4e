use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::application::use_cases::{StreamChatUseCase, stream_chat::ChatEventStream};
use crate::presentation::http::dto::{
    ChatRequestDto, ModelsResponseDto, SuggestedQuestionsResponseDto,
};
use crate::presentation::http::errors::AppError;

pub struct ChatHandler {
    stream_chat_use_case: Arc<StreamChatUseCase>,
}

impl ChatHandler {
    pub fn new(stream_chat_use_case: Arc<StreamChatUseCase>) -> Self {
        Self {
            stream_chat_use_case,
        }
    }

    pub async fn chat(
        State(handler): State<Arc<ChatHandler>>,
        payload: Result<Json<ChatRequestDto>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = payload?;
        tracing::info!(
            "Chat request {} with {} messages",
            request.id.as_deref().unwrap_or("-"),
            request.messages.len()
        );

        let events = handler.stream_chat_use_case.execute(request.into()).await?;

        Ok(ndjson_response(events))
    }

    pub async fn models() -> impl IntoResponse {
        (StatusCode::OK, Json(ModelsResponseDto::catalog()))
    }

    pub async fn suggested_questions() -> impl IntoResponse {
        (StatusCode::OK, Json(SuggestedQuestionsResponseDto::default()))
    }
}

/// Forwards the events from a spawned task so a disconnected client stops
/// the upstream stream at the next send.
fn ndjson_response(mut events: ChatEventStream) -> Response {
    let (tx, rx) = mpsc::unbounded_channel::<Result<Bytes, std::io::Error>>();

    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            if tx.send(Ok(Bytes::from(event.to_ndjson_line()))).is_err() {
                tracing::debug!("Chat client disconnected, dropping upstream stream");
                break;
            }
        }
    });

    let mut response = Response::new(Body::from_stream(UnboundedReceiverStream::new(rx)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
