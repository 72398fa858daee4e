use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::application::ports::rate_limiter::RateLimitPolicy;
use crate::application::use_cases::sync_posts_to_cache::DEFAULT_CACHE_TTL;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} not set", key),
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {}: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub embedding_model: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub gemini: GeminiConfig,
    pub openai: OpenAiConfig,
    pub reddit_export_path: String,
    pub cache_ttl: Duration,
    pub rate_limit: RateLimitPolicy,
    pub knowledge_retrieval_enabled: bool,
    pub port: u16,
    pub request_body_limit_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let default_policy = RateLimitPolicy::default();

        Ok(Self {
            database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            redis_url: get("REDIS_URL"),
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                api_base: api_base_or(
                    &get,
                    "GEMINI_API_BASE",
                    "https://generativelanguage.googleapis.com",
                )?,
                embedding_model: get("GEMINI_EMBEDDING_MODEL")
                    .unwrap_or_else(|| "text-embedding-004".to_string()),
            },
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY"),
                api_base: api_base_or(&get, "OPENAI_API_BASE", "https://api.openai.com")?,
            },
            reddit_export_path: get("REDDIT_EXPORT_PATH")
                .unwrap_or_else(|| "./reddit.json".to_string()),
            cache_ttl: parse_or(&get, "CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL.as_secs())
                .map(Duration::from_secs)?,
            rate_limit: RateLimitPolicy {
                max_requests: parse_or(&get, "RATE_LIMIT_MAX_REQUESTS", default_policy.max_requests)?,
                window: parse_or(
                    &get,
                    "RATE_LIMIT_WINDOW_SECONDS",
                    default_policy.window.as_secs(),
                )
                .map(Duration::from_secs)?,
            },
            knowledge_retrieval_enabled: parse_or(&get, "KNOWLEDGE_RETRIEVAL_ENABLED", false)?,
            port: parse_or(&get, "PORT", 3000)?,
            request_body_limit_bytes: parse_or(&get, "REQUEST_BODY_LIMIT_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// Upstream base URLs must be absolute http(s) URLs.
fn api_base_or<G>(get: &G, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key).unwrap_or_else(|| default.to_string());
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(raw.trim().to_string()),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/firepk")]).unwrap();

        assert_eq!(config.redis_url, None);
        assert_eq!(config.reddit_export_path, "./reddit.json");
        assert_eq!(config.cache_ttl, Duration::from_secs(604_800));
        assert_eq!(config.rate_limit.max_requests, 2);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert!(!config.knowledge_retrieval_enabled);
        assert_eq!(config.port, 3000);
        assert_eq!(config.gemini.embedding_model, "text-embedding-004");
        assert_eq!(config.openai.api_base, "https://api.openai.com");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/firepk"),
            ("REDIS_URL", "redis://cache:6379"),
            ("RATE_LIMIT_MAX_REQUESTS", "10"),
            ("RATE_LIMIT_WINDOW_SECONDS", "30"),
            ("KNOWLEDGE_RETRIEVAL_ENABLED", "true"),
            ("GEMINI_API_KEY", "  "),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window, Duration::from_secs(30));
        assert!(config.knowledge_retrieval_enabled);
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_invalid_number() {
        let result = config_from(&[("DATABASE_URL", "postgres://db"), ("PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }

    #[test]
    fn test_invalid_api_base() {
        let result = config_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("OPENAI_API_BASE", "api.openai.com"),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "OPENAI_API_BASE", .. })
        ));

        let config = config_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("GEMINI_API_BASE", "http://localhost:8089/"),
        ])
        .unwrap();
        assert_eq!(config.gemini.api_base, "http://localhost:8089/");
    }
}
