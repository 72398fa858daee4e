pub mod cache_routes;
pub mod chat_routes;
pub mod health_routes;
pub mod knowledge_routes;
pub mod reddit_routes;

pub use cache_routes::*;
pub use chat_routes::*;
pub use health_routes::*;
pub use knowledge_routes::*;
pub use reddit_routes::*;
