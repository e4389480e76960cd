//! OpenRouter Gateway for chat completions.
//!
//! OpenRouter speaks the OpenAI chat-completions dialect, so this gateway posts
//! `{ model, messages }` to `{base_url}/chat/completions` and reads
//! `choices[0].message.content` from the reply.

use crate::error::{AskError, Result};
use crate::llm::gateway::LlmGateway;
use crate::llm::models::LlmMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Configuration for connecting to the OpenRouter API.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

/// Gateway for the OpenRouter chat-completion service.
pub struct OpenRouterGateway {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterGateway {
    /// Create a new gateway with custom configuration.
    pub fn with_config(config: OpenRouterConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| AskError::GatewayError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(OpenRouterConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: None,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// Pull `choices[0].message.content` out of a decoded completion body.
fn extract_content(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| AskError::MalformedResponse("No content in response".to_string()))
}

fn classify_transport_error(err: reqwest::Error) -> AskError {
    if err.is_timeout() {
        AskError::TimeoutError(err.to_string())
    } else {
        AskError::HttpError(err)
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(&self, model: &str, messages: &[LlmMessage]) -> Result<String> {
        info!("Delegating to OpenRouter for completion");
        debug!(model = model, message_count = messages.len(), "Building completion request");

        let body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "OpenRouter returned an error status");
            return Err(AskError::ApiError {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let raw = response.text().await.map_err(classify_transport_error)?;
        let response_body: Value = serde_json::from_str(&raw)?;

        extract_content(&response_body)
    }
}
