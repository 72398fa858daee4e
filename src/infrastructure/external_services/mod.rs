pub mod gemini_chat_client;
pub mod gemini_embedding_client;
pub mod openai_chat_client;
pub mod sse_stream;

pub use gemini_chat_client::GeminiChatClient;
pub use gemini_embedding_client::{EmbeddingClientConfig, GeminiEmbeddingClient};
pub use openai_chat_client::OpenAiChatClient;
