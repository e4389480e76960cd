pub mod openrouter;

pub use openrouter::{OpenRouterConfig, OpenRouterGateway};
