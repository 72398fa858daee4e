use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use regex::Regex;

static ROOT_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[\w-]+\.\w+$").expect("Valid root file pattern"));

const SECURITY_HEADERS: [(&str, &str); 7] = [
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self' 'unsafe-inline' 'unsafe-eval'; style-src 'self' 'unsafe-inline';",
    ),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    (
        "permissions-policy",
        "camera=(), microphone=(), geolocation=(), interest-cohort=()",
    ),
];

/// API routes and root-level files such as `/favicon.ico` are left alone.
pub fn applies_to(path: &str) -> bool {
    let is_api = path == "/api" || path.starts_with("/api/");
    !is_api && !ROOT_FILE.is_match(path)
}

pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let apply = applies_to(request.uri().path());
    let mut response = next.run(request).await;

    if apply {
        let headers = response.headers_mut();
        for (name, value) in SECURITY_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_get_headers() {
        assert!(applies_to("/"));
        assert!(applies_to("/health"));
        assert!(applies_to("/chat/123"));
    }

    #[test]
    fn test_api_and_root_files_are_skipped() {
        assert!(!applies_to("/api"));
        assert!(!applies_to("/api/chat"));
        assert!(!applies_to("/favicon.ico"));
        assert!(applies_to("/apiary"));
    }
}
