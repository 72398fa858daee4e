pub mod chat_message;
pub mod chat_model;
pub mod knowledge_chunk;
pub mod reddit_post;

pub use chat_message::{ChatMessage, ChatRole, Conversation};
pub use chat_model::{ChatModel, ModelProvider};
pub use knowledge_chunk::{KnowledgeChunk, KnowledgeMatch};
pub use reddit_post::RedditPost;
