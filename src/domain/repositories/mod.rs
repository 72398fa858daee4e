pub mod knowledge_chunk_repository;
pub mod reddit_post_repository;

pub use knowledge_chunk_repository::KnowledgeChunkRepository;
pub use reddit_post_repository::RedditPostRepository;
