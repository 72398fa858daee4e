use axum::{Router, middleware};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::application::ports::RateLimiter;
use crate::presentation::http::{
    handlers::{CacheHandler, ChatHandler, KnowledgeHandler, RedditHandler},
    middleware::security_headers_middleware,
    routes::{cache_routes, chat_routes, health_routes, knowledge_routes, reddit_routes},
};

pub struct HttpServer {
    chat_handler: Arc<ChatHandler>,
    reddit_handler: Arc<RedditHandler>,
    cache_handler: Arc<CacheHandler>,
    knowledge_handler: Arc<KnowledgeHandler>,
    rate_limiter: Arc<dyn RateLimiter>,
    port: u16,
    request_body_limit: usize,
}

impl HttpServer {
    pub fn new(
        chat_handler: Arc<ChatHandler>,
        reddit_handler: Arc<RedditHandler>,
        cache_handler: Arc<CacheHandler>,
        knowledge_handler: Arc<KnowledgeHandler>,
        rate_limiter: Arc<dyn RateLimiter>,
        port: Option<u16>,
        request_body_limit: usize,
    ) -> Self {
        Self {
            chat_handler,
            reddit_handler,
            cache_handler,
            knowledge_handler,
            rate_limiter,
            port: port.unwrap_or(3000),
            request_body_limit,
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health_routes())
            .merge(chat_routes(
                self.chat_handler.clone(),
                self.rate_limiter.clone(),
            ))
            .merge(reddit_routes(self.reddit_handler.clone()))
            .merge(cache_routes(self.cache_handler.clone()))
            .merge(knowledge_routes(self.knowledge_handler.clone()))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(self.request_body_limit))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
