//! Error types and result aliases for the ask-ai crate.
//!
//! This module defines the core error type [`AskError`] and the [`Result`] type alias
//! used throughout the crate. Gateway failures come back as typed variants so the
//! chat controller can decide what the viewer sees; selection failures are ordinary
//! `Err` values the front end shows as warnings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AskError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to persist history: {0}")]
    PersistError(String),

    #[error("Index {index} is out of range for a history of {len} turns")]
    OutOfRange { index: usize, len: usize },

    #[error("Turn {index} is not paired with the reply that follows it")]
    PairingMismatch { index: usize },
}

impl AskError {
    /// True for failures of the completion call itself, which the controller
    /// replaces with the fallback reply.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            AskError::GatewayError(_)
                | AskError::ApiError { .. }
                | AskError::MalformedResponse(_)
                | AskError::TimeoutError(_)
                | AskError::HttpError(_)
                | AskError::SerializationError(_)
        )
    }
}

impl From<tempfile::PersistError> for AskError {
    fn from(err: tempfile::PersistError) -> Self {
        AskError::PersistError(err.error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = AskError::ConfigError("missing API key".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: missing API key");
    }

    #[test]
    fn test_api_error_display() {
        let err = AskError::ApiError {
            status: 429,
            body: "rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 429 - rate limit exceeded");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = AskError::OutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "Index 5 is out of range for a history of 2 turns");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AskError = json_err.into();

        match err {
            AskError::SerializationError(_) => {}
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AskError = io_err.into();

        match err {
            AskError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }

    #[test]
    fn test_completion_failure_classification() {
        assert!(AskError::GatewayError("x".to_string()).is_completion_failure());
        assert!(AskError::TimeoutError("x".to_string()).is_completion_failure());
        assert!(AskError::MalformedResponse("x".to_string()).is_completion_failure());
        assert!(AskError::ApiError {
            status: 500,
            body: String::new()
        }
        .is_completion_failure());

        assert!(!AskError::ConfigError("x".to_string()).is_completion_failure());
        assert!(!AskError::OutOfRange { index: 0, len: 0 }.is_completion_failure());
        assert!(!AskError::PersistError("x".to_string()).is_completion_failure());
    }
}
