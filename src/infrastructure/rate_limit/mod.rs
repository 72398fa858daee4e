pub mod in_memory_sliding_window;
pub mod redis_sliding_window;

pub use in_memory_sliding_window::InMemorySlidingWindowLimiter;
pub use redis_sliding_window::RedisSlidingWindowLimiter;
