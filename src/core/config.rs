//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::Model;

/// Default chat-completion endpoint.
const DEFAULT_API_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model registry: (registry key, backend model id).
/// Order here is fan-out order and output column order.
const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("gpt-4o", "openai/gpt-4o"),
    ("claude-sonnet-4", "anthropic/claude-sonnet-4"),
    ("claude-opus-4", "anthropic/claude-opus-4"),
    ("gemini-2.5-pro", "google/gemini-2.5-pro-preview"),
];

/// Configuration for the translation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub api_endpoint: String,
    /// Registered backend models, in fan-out order.
    pub models: Vec<Model>,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Pause after every backend call; the pipeline's only rate limiter.
    pub rate_limit_delay_ms: u64,
    /// Rows between progress checkpoints.
    pub save_interval: usize,
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            models: vec![],
            temperature: 0.3,
            max_tokens: 1000,
            rate_limit_delay_ms: 1000,
            save_interval: 10,
            timeout_ms: 30000,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            TranslationError::ConfigError {
                message: "OPENROUTER_API_KEY environment variable is required".to_string(),
            }
        })?;

        let api_endpoint = std::env::var("API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string());

        Ok(Self {
            api_key,
            api_endpoint,
            ..Self::default()
        })
    }

    /// Load configuration with the default model registry
    pub fn load() -> Result<Self> {
        let mut config = Self::from_env()?;

        if config.models.is_empty() {
            config.models = Self::default_models();
            info!("Loaded {} default models", config.models.len());
        }

        Ok(config)
    }

    /// The built-in model registry
    pub fn default_models() -> Vec<Model> {
        DEFAULT_MODELS
            .iter()
            .map(|(key, id)| Model {
                key: (*key).to_string(),
                id: (*id).to_string(),
                enabled: true,
            })
            .collect()
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API key is required".to_string(),
            });
        }

        if self.api_endpoint.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.models.is_empty() {
            warn!("No models configured");
        }

        if self.save_interval == 0 {
            return Err(TranslationError::ConfigError {
                message: "save_interval must be greater than 0".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get all enabled models, in registry order
    pub fn enabled_models(&self) -> Vec<&Model> {
        self.models.iter().filter(|m| m.enabled).collect()
    }

    /// Registry keys of enabled models, in registry order
    pub fn model_keys(&self) -> Vec<String> {
        self.models
            .iter()
            .filter(|m| m.enabled)
            .map(|m| m.key.clone())
            .collect()
    }

    /// Resolve a registry key to its model entry
    pub fn find_model(&self, key: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.key == key && m.enabled)
    }
}
