//! LLM Client module for ContentForge
//!
//! The model service behind every pipeline stage: a provider-agnostic
//! [`LlmClient`] trait plus Anthropic and OpenAI implementations.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod http;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage, ToolCall, ToolDefinition};

use crate::config::LlmConfig;

/// Providers `create_client` knows how to build
pub const SUPPORTED_PROVIDERS: &[&str] = &["anthropic", "openai"];

/// Create an LLM client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown LLM provider: '{}'. Supported: {}",
                other,
                SUPPORTED_PROVIDERS.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "llamafile".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().expect("unknown provider should fail");
        assert!(err.to_string().contains("Unknown LLM provider: 'llamafile'"));
    }

    #[test]
    fn test_create_client_missing_key() {
        let config = LlmConfig {
            api_key_env: "CONTENTFORGE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            api_key_file: None,
            ..LlmConfig::default()
        };
        assert!(create_client(&config).is_err());
    }
}
