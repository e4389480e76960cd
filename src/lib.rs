pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod session;
pub mod ui;

pub use error::{AskError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::{AskError, Result};
    pub use crate::history::{History, HistoryStore, Turn};
    pub use crate::llm::gateways::{OpenRouterConfig, OpenRouterGateway};
    pub use crate::llm::{LlmGateway, LlmMessage, MessageRole};
    pub use crate::session::{ChatController, CycleOutcome, Trigger, FALLBACK_REPLY};
}
