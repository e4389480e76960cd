//! Start-up configuration.
//!
//! Everything is read once from the process environment (after an optional
//! `.env` file has been loaded by the binary). The API key is mandatory; the
//! rest falls back to the values the client was built around.

use crate::error::{AskError, Result};
use crate::llm::gateways::openrouter::{OpenRouterConfig, DEFAULT_BASE_URL};
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const ENDPOINT_VAR: &str = "OPENROUTER_API_ENDPOINT";
pub const TIMEOUT_VAR: &str = "ASK_AI_TIMEOUT_SECS";
pub const HISTORY_PATH_VAR: &str = "ASK_AI_HISTORY_PATH";

pub const DEFAULT_MODEL: &str = "meta-llama/llama-3-8b-instruct";
pub const DEFAULT_INSTRUCTION_SUFFIX: &str = "Please reply in English only.";
pub const DEFAULT_HISTORY_PATH: &str = "chat_history.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: OpenRouterConfig,
    pub model: String,
    pub instruction_suffix: String,
    pub history_path: PathBuf,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AskError::ConfigError(format!("{API_KEY_VAR} is not set")))?;

        let base_url = lookup(ENDPOINT_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        let history_path = lookup(HISTORY_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH));

        Ok(Self {
            gateway: OpenRouterConfig {
                api_key,
                base_url,
                timeout: Some(timeout),
            },
            model: DEFAULT_MODEL.to_string(),
            instruction_suffix: DEFAULT_INSTRUCTION_SUFFIX.to_string(),
            history_path,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AskError::ConfigError(format!(
            "{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"
        ))
    })?;

    if secs == 0 {
        return Err(AskError::ConfigError(format!("{TIMEOUT_VAR} must be greater than zero")));
    }

    Ok(Duration::from_secs(secs))
}
