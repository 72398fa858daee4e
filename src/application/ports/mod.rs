pub mod cache_store;
pub mod chat_provider;
pub mod embedding_provider;
pub mod export_source;
pub mod rate_limiter;

pub use cache_store::CacheStore;
pub use chat_provider::ChatCompletionProvider;
pub use embedding_provider::EmbeddingProvider;
pub use export_source::ExportSource;
pub use rate_limiter::RateLimiter;
