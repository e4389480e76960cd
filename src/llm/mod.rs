pub mod gateway;
pub mod gateways;
pub mod models;

pub use gateway::LlmGateway;
pub use models::{LlmMessage, MessageRole};
