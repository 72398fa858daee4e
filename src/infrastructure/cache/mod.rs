pub mod in_memory_cache_store;
pub mod redis_cache_store;

pub use in_memory_cache_store::InMemoryCacheStore;
pub use redis_cache_store::{RedisCacheStore, create_redis_pool};
