use crate::error::Result;
use crate::llm::models::LlmMessage;
use async_trait::async_trait;

/// Abstract interface for chat-completion providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send `messages` to `model` and return the text of the first choice.
    ///
    /// Every failure mode (transport, timeout, non-success status, unexpected
    /// body) comes back as an `Err`; callers decide what to show instead.
    async fn complete(&self, model: &str, messages: &[LlmMessage]) -> Result<String>;
}
