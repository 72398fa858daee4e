pub mod add_knowledge_chunk;
pub mod get_reddit_post;
pub mod import_reddit_export;
pub mod import_reddit_listings;
pub mod list_reddit_posts;
pub mod query_reddit_post;
pub mod search_knowledge;
pub mod store_reddit_post;
pub mod stream_chat;
pub mod sync_posts_to_cache;

pub use add_knowledge_chunk::AddKnowledgeChunkUseCase;
pub use get_reddit_post::GetRedditPostUseCase;
pub use import_reddit_export::ImportRedditExportUseCase;
pub use import_reddit_listings::ImportRedditListingsUseCase;
pub use list_reddit_posts::ListRedditPostsUseCase;
pub use query_reddit_post::QueryRedditPostUseCase;
pub use search_knowledge::SearchKnowledgeUseCase;
pub use store_reddit_post::StoreRedditPostUseCase;
pub use stream_chat::StreamChatUseCase;
pub use sync_posts_to_cache::SyncPostsToCacheUseCase;
