//! ContentForge configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::llm::SUPPORTED_PROVIDERS;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".contentforge.yml";

/// Main ContentForge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Pipeline behaviour
    pub pipeline: PipelineConfig,

    /// Prompt template lookup
    pub prompts: PromptsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks the provider name and that an API key can be found. Call this
    /// before any command that talks to the model service.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(eyre::eyre!(
                "Unknown LLM provider '{}'. Supported: {}",
                self.llm.provider,
                SUPPORTED_PROVIDERS.join(", ")
            ));
        }
        self.llm.get_api_key().map(|_| ())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config is reported properly by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::candidate_paths(),
        };
        paths
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(&p).ok())
            .and_then(|c| c.log_level)
    }

    /// Config files searched when no explicit path is given, in order
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("contentforge").join("contentforge.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.llm.apply_provider_defaults();

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File containing the API key, used when the env var is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

/// Model, key variable and base URL a provider starts from
struct ProviderDefaults {
    provider: &'static str,
    model: &'static str,
    api_key_env: &'static str,
    base_url: &'static str,
}

const ANTHROPIC_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider: "anthropic",
    model: "claude-sonnet-4-20250514",
    api_key_env: "ANTHROPIC_API_KEY",
    base_url: "https://api.anthropic.com",
};

const OPENAI_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider: "openai",
    model: "gpt-4o",
    api_key_env: "OPENAI_API_KEY",
    base_url: "https://api.openai.com",
};

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: ANTHROPIC_DEFAULTS.model.to_string(),
            api_key_env: ANTHROPIC_DEFAULTS.api_key_env.to_string(),
            api_key_file: None,
            base_url: ANTHROPIC_DEFAULTS.base_url.to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Swap in the selected provider's defaults for fields left at another
    /// provider's defaults
    ///
    /// Unset fields deserialize to the Anthropic defaults, so `provider: openai`
    /// alone must not keep a Claude model or the Anthropic endpoint.
    pub fn apply_provider_defaults(&mut self) {
        debug!(provider = %self.provider, "LlmConfig::apply_provider_defaults: called");
        let all = [ANTHROPIC_DEFAULTS, OPENAI_DEFAULTS];
        let Some(target) = all.iter().find(|d| d.provider == self.provider) else {
            return;
        };
        for other in all.iter().filter(|d| d.provider != target.provider) {
            if self.model == other.model {
                self.model = target.model.to_string();
            }
            if self.api_key_env == other.api_key_env {
                self.api_key_env = target.api_key_env.to_string();
            }
            if self.base_url == other.base_url {
                self.base_url = target.base_url.to_string();
            }
        }
    }

    /// Resolve the API key: environment variable first, then key file
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "LlmConfig::get_api_key: called");
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            debug!("LlmConfig::get_api_key: found in environment");
            return Ok(key.trim().to_string());
        }

        if let Some(file) = &self.api_key_file {
            let path = expand_tilde(file);
            debug!(?path, "LlmConfig::get_api_key: trying key file");
            let key = fs::read_to_string(&path).context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
            return Err(eyre::eyre!("API key file {} is empty", path.display()));
        }

        Err(eyre::eyre!(
            "LLM API key not found. Set the {} environment variable or api-key-file in your config.",
            self.api_key_env
        ))
    }
}

/// Pipeline behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run one extra regeneration call per drafted section
    #[serde(rename = "refine-sections")]
    pub refine_sections: bool,

    /// Most refinement calls in flight at once
    #[serde(rename = "refine-concurrency")]
    pub refine_concurrency: usize,

    /// Number of ideas the prompt asks for
    #[serde(rename = "idea-count")]
    pub idea_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            refine_sections: false,
            refine_concurrency: 4,
            idea_count: 5,
        }
    }
}

/// Prompt template lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// User override directory, checked before `prompts/` and the embedded copies
    pub dir: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dir: ".contentforge/prompts".to_string(),
        }
    }
}

impl PromptsConfig {
    /// Override directory with `~/` expanded
    pub fn expanded_dir(&self) -> PathBuf {
        expand_tilde(&self.dir)
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
