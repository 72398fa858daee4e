pub mod knowledge_service;
pub mod post_context_service;
pub mod prompt;
pub mod reddit_normalizer;

pub use knowledge_service::KnowledgeService;
pub use post_context_service::PostContextService;
