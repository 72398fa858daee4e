use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::ports::RateLimiter;
use crate::presentation::http::handlers::ChatHandler;
use crate::presentation::http::middleware::rate_limit_middleware;

pub fn chat_routes(chat_handler: Arc<ChatHandler>, rate_limiter: Arc<dyn RateLimiter>) -> Router {
    Router::new()
        .route("/api/chat", post(ChatHandler::chat))
        .route_layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .route("/api/models", get(ChatHandler::models))
        .route("/api/suggested-questions", get(ChatHandler::suggested_questions))
        .with_state(chat_handler)
}
