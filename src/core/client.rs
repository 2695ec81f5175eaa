//! HTTP chat-completion client with sequential per-model fan-out

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationOutcome;
use crate::core::normalize::clean_reply;
use crate::core::prompts::build_prompt;

/// Client for a chat-completion backend hosting several models.
///
/// A single failed call is final for that (text, model) pair: there are no
/// retries, and failures are folded into [`TranslationOutcome::Failed`]
/// rather than propagated.
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
}

impl Translator {
    /// Create a new translator from an explicit configuration
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::load()?;
        Self::new(config)
    }

    /// The underlying configuration
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Enabled registry keys, in fan-out order
    pub fn model_keys(&self) -> Vec<String> {
        self.config.model_keys()
    }

    /// Translate one text with one registered model.
    ///
    /// Every failure mode (unknown key, non-200 status, timeout, transport
    /// or parse error, unusable reply) is logged and returned as `Failed`.
    pub async fn translate(&self, text: &str, model_key: &str) -> TranslationOutcome {
        let Some(model) = self.config.find_model(model_key) else {
            warn!("Unknown model: {}", model_key);
            return TranslationOutcome::Failed;
        };

        match self.send_request(text, &model.id).await {
            Ok(content) => match clean_reply(&content) {
                Some(line) => TranslationOutcome::Translated(line),
                None => {
                    warn!("Empty reply from {}", model_key);
                    TranslationOutcome::Failed
                }
            },
            Err(TranslationError::TimeoutError) => {
                warn!("Timeout error for {}", model_key);
                TranslationOutcome::Failed
            }
            Err(TranslationError::ApiError { status, message }) => {
                warn!("API error for {}: {} - {}", model_key, status, message);
                TranslationOutcome::Failed
            }
            Err(e) => {
                warn!("Error translating with {}: {}", model_key, e);
                TranslationOutcome::Failed
            }
        }
    }

    /// Translate one text with every enabled model, sequentially.
    ///
    /// Returns exactly one outcome per enabled registry key, in registry
    /// order. The fixed inter-call pause applies after every call, success
    /// or not; it is the pipeline's only rate limiter, which is why this
    /// loop must stay sequential.
    pub async fn translate_all(&self, text: &str) -> Vec<(String, TranslationOutcome)> {
        let delay = Duration::from_millis(self.config.rate_limit_delay_ms);
        let models = self.config.enabled_models();
        let mut outcomes = Vec::with_capacity(models.len());

        for model in models {
            info!("Translating with {}...", model.key);
            let outcome = self.translate(text, &model.key).await;
            outcomes.push((model.key.clone(), outcome));
            sleep(delay).await;
        }

        outcomes
    }

    /// Send one HTTP request and extract the raw reply text
    async fn send_request(&self, text: &str, model_id: &str) -> Result<String> {
        let prompt = build_prompt(text);

        let body = serde_json::json!({
            "model": model_id,
            "messages": [{
                "role": "user",
                "content": prompt
            }],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens
        });

        debug!("POST {} model={}", self.config.api_endpoint, model_id);

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "http://localhost:3000")
            .header("X-Title", "Medical Safety Japanese Translation")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::TimeoutError
                } else {
                    TranslationError::NetworkError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let json: serde_json::Value =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::InvalidResponseError {
                        message: e.to_string(),
                    })?;

            let content = json["choices"]
                .get(0)
                .and_then(|c| c["message"]["content"].as_str())
                .ok_or_else(|| TranslationError::InvalidResponseError {
                    message: "No translation in response".to_string(),
                })?;

            Ok(content.to_string())
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            Err(TranslationError::ApiError {
                status: status_code,
                message: error_text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Model;

    /// Config pointing at a dead endpoint so calls fail fast without the
    /// network, with the inter-call pause shrunk to keep tests quick.
    fn offline_config() -> TranslatorConfig {
        TranslatorConfig {
            api_key: "test_key".to_string(),
            api_endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            models: vec![
                Model {
                    key: "model-a".to_string(),
                    id: "vendor/model-a".to_string(),
                    enabled: true,
                },
                Model {
                    key: "model-b".to_string(),
                    id: "vendor/model-b".to_string(),
                    enabled: true,
                },
            ],
            rate_limit_delay_ms: 1,
            timeout_ms: 2000,
            ..Default::default()
        }
    }

    #[test]
    fn test_translator_creation() {
        assert!(Translator::new(offline_config()).is_ok());
    }

    #[test]
    fn test_translator_rejects_empty_api_key() {
        let config = TranslatorConfig {
            api_key: String::new(),
            ..offline_config()
        };
        assert!(Translator::new(config).is_err());
    }

    #[tokio::test]
    async fn test_unknown_model_key_fails_without_network() {
        let translator = Translator::new(offline_config()).unwrap();
        let outcome = translator.translate("hello", "no-such-model").await;
        assert_eq!(outcome, TranslationOutcome::Failed);
    }

    #[tokio::test]
    async fn test_unreachable_backend_folds_into_failed() {
        let translator = Translator::new(offline_config()).unwrap();
        let outcome = translator.translate("hello", "model-a").await;
        assert_eq!(outcome, TranslationOutcome::Failed);
    }

    #[tokio::test]
    async fn test_fan_out_covers_every_key_in_order() {
        let translator = Translator::new(offline_config()).unwrap();
        let outcomes = translator.translate_all("hello").await;

        let keys: Vec<&str> = outcomes.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["model-a", "model-b"]);
        assert!(outcomes
            .iter()
            .all(|(_, outcome)| *outcome == TranslationOutcome::Failed));
    }
}
