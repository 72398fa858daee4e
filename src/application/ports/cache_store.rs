use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    CommandError(String),
    SerializationError(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::ConnectionError(msg) => write!(f, "Cache connection error: {}", msg),
            CacheError::CommandError(msg) => write!(f, "Cache command error: {}", msg),
            CacheError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
}

impl CacheEntry {
    pub fn json<T: serde::Serialize>(key: impl Into<String>, value: &T) -> Result<Self, CacheError> {
        let value =
            serde_json::to_string(value).map_err(|e| CacheError::SerializationError(e.to_string()))?;
        Ok(Self {
            key: key.into(),
            value,
        })
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Writes every entry with the same expiry as one batch.
    async fn set_many(&self, entries: &[CacheEntry], ttl: Duration) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
}
