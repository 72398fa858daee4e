use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::RedditHandler;

pub fn reddit_routes(reddit_handler: Arc<RedditHandler>) -> Router {
    Router::new()
        .route(
            "/api/reddit",
            get(RedditHandler::list_posts).post(RedditHandler::store_post),
        )
        .route("/api/reddit/query", get(RedditHandler::query_post))
        .route("/api/reddit/import", post(RedditHandler::import_export))
        .route("/api/reddit/import-all", post(RedditHandler::import_listings))
        .route("/api/reddit/{post_id}", get(RedditHandler::get_post))
        .with_state(reddit_handler)
}
