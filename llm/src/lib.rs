//! Ask a chat-completion server questions.
//!
//! The `llm` crate defines an [`LLMClient`] trait along with
//! [`OpenAIClient`], which talks to any OpenAI compatible
//! `/chat/completions` endpoint and returns the first reply.

pub mod client;
pub mod config;
pub mod traits;
pub mod types;

pub use client::OpenAIClient;
pub use config::ChatConfig;
pub use traits::{LLMClient, LLMError};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Role};
