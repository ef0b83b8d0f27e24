//! HTTP client for OpenAI compatible chat-completion servers.
//!
//! [`OpenAIClient`] sends a single non-streaming request per question: a
//! fixed system prompt followed by the user's question. The reply is the
//! content of the first returned choice.

use crate::config::ChatConfig;
use crate::traits::{LLMClient, LLMError};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

pub struct OpenAIClient {
    config: ChatConfig,
    http: Client,
}

impl OpenAIClient {
    pub fn new(config: ChatConfig) -> Result<Self, LLMError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| LLMError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn request(&self, question: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(self.config.system_prompt.clone()),
                ChatMessage::user(question),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn ask(&self, question: &str) -> Result<String, LLMError> {
        if question.trim().is_empty() {
            return Err(LLMError::EmptyInput);
        }
        info!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            "requesting completion"
        );
        let resp = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.request(question))
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "completion request rejected");
            return Err(LLMError::Upstream(status.as_u16()));
        }
        let body: ChatResponse = resp.json().await.map_err(|e| {
            debug!(error = %e, "unreadable completion body");
            LLMError::InvalidResponse
        })?;
        body.into_first_reply().ok_or(LLMError::InvalidResponse)
    }
}
