pub mod cache_handler;
pub mod chat_handler;
pub mod knowledge_handler;
pub mod reddit_handler;

pub use cache_handler::CacheHandler;
pub use chat_handler::ChatHandler;
pub use knowledge_handler::KnowledgeHandler;
pub use reddit_handler::RedditHandler;
