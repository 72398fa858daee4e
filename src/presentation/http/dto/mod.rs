pub mod chat_dto;
pub mod knowledge_dto;
pub mod reddit_dto;
pub mod response_dto;

pub use chat_dto::*;
pub use knowledge_dto::*;
pub use reddit_dto::*;
pub use response_dto::*;
