pub mod chat_event;
pub mod client_key;
pub mod processed_post;

pub use chat_event::ChatStreamEvent;
pub use client_key::ClientKey;
pub use processed_post::{ProcessedComment, ProcessedPost};
