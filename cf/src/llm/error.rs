//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the model service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Short message suitable for showing to a user
    ///
    /// Provider error bodies are JSON envelopes; pull out the inner
    /// `error.message` when there is one instead of echoing the whole body.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::ApiError { status, message } => {
                let inner = serde_json::from_str::<serde_json::Value>(message)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(str::to_string));
                match inner {
                    Some(msg) if !msg.trim().is_empty() => format!("API error {}: {}", status, msg),
                    _ if message.trim().is_empty() => format!("API error {}", status),
                    _ => self.to_string(),
                }
            }
            LlmError::Timeout(_) => "Request to the model service timed out".to_string(),
            _ => self.to_string(),
        }
    }
}
