pub mod knowledge_chunk_model;
pub mod reddit_post_model;

pub use knowledge_chunk_model::*;
pub use reddit_post_model::*;
