use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::application::ports::RateLimiter;
use crate::application::ports::rate_limiter::RateLimitDecision;
use crate::domain::value_objects::ClientKey;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";
const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// First `X-Forwarded-For` hop, else `X-Real-IP`, else anonymous.
pub fn client_key(headers: &HeaderMap) -> ClientKey {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let address = header(FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| header(REAL_IP));

    match address {
        Some(address) => ClientKey::from_address(address),
        None => ClientKey::anonymous(),
    }
}

pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<dyn RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(request.headers());

    match rate_limiter.check(&key).await {
        Ok(decision) if !decision.allowed => {
            tracing::warn!("Rate limit exceeded for client {}", key);
            too_many_requests(&decision)
        }
        Ok(decision) => {
            let mut response = next.run(request).await;
            insert_limit_headers(response.headers_mut(), &decision);
            response
        }
        Err(e) => {
            tracing::warn!("Rate limiter unavailable, allowing request: {}", e);
            next.run(request).await
        }
    }
}

fn too_many_requests(decision: &RateLimitDecision) -> Response {
    let retry_after = decision.retry_after_secs(chrono::Utc::now().timestamp_millis());

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "error": "Too many requests",
            "message": format!(
                "Rate limit exceeded. Please try again in {} seconds.",
                retry_after
            ),
        })),
    )
        .into_response();

    let headers = response.headers_mut();
    insert_limit_headers(headers, decision);
    headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

fn insert_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
    headers.insert(RESET_HEADER, HeaderValue::from(decision.reset_at_ms));
}
