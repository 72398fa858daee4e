use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::CacheHandler;

pub fn cache_routes(cache_handler: Arc<CacheHandler>) -> Router {
    Router::new()
        .route("/api/sync-reddit-to-kv", get(CacheHandler::sync_posts))
        .with_state(cache_handler)
}
