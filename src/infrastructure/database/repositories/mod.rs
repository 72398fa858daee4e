pub mod postgres_knowledge_chunk_repository;
pub mod postgres_reddit_post_repository;

pub use postgres_knowledge_chunk_repository::PostgresKnowledgeChunkRepository;
pub use postgres_reddit_post_repository::PostgresRedditPostRepository;
