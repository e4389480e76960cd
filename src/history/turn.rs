use crate::llm::models::MessageRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One utterance in the conversation.
///
/// A user turn and the reply to it share the same `exchange` key, so a reply
/// can be matched to its prompt without relying on adjacency alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: MessageRole,
    text: String,
    exchange: Uuid,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// Start a new exchange with a user prompt.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text, Uuid::new_v4())
    }

    /// Reply within an existing exchange.
    pub fn assistant(exchange: Uuid, text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text, exchange)
    }

    pub(crate) fn new(role: MessageRole, text: impl Into<String>, exchange: Uuid) -> Self {
        Self {
            role,
            text: text.into(),
            exchange,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn exchange(&self) -> Uuid {
        self.exchange
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
