use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("question cannot be empty")]
    EmptyInput,
    #[error("upstream returned status {0}")]
    Upstream(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response")]
    InvalidResponse,
}

#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Ask `question` and return the model's reply.
    ///
    /// Blank questions fail with [`LLMError::EmptyInput`] without contacting
    /// the server.
    async fn ask(&self, question: &str) -> Result<String, LLMError>;
}
