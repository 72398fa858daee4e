use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::KnowledgeHandler;

pub fn knowledge_routes(knowledge_handler: Arc<KnowledgeHandler>) -> Router {
    Router::new()
        .route("/api/knowledge", post(KnowledgeHandler::add_chunk))
        .route("/api/knowledge/search", get(KnowledgeHandler::search))
        .with_state(knowledge_handler)
}
