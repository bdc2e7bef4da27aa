//! LLM client with liveness check and bounded retry

use super::{HttpBackend, LLMBackend};
use crate::config::{Config, ProviderConfig, ProviderKind};
use crate::error::{PromptOptError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Error-text markers of a malformed reply from the model server
pub const MALFORMED_RESPONSE_MARKERS: [&str; 2] = ["unmarshal", "invalid character"];

/// Whether an error message looks like a malformed-response failure
pub fn is_malformed_response(message: &str) -> bool {
    MALFORMED_RESPONSE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Fixed-delay retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts used by [`LLMClient::invoke`]
    pub attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
    /// Pause after a malformed-response failure
    pub malformed_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
            malformed_delay: Duration::from_secs(1),
        }
    }
}

/// Summary of the connected server, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInfo {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Client for a locally hosted model server
///
/// Construction only succeeds once the server has answered its liveness
/// check, so every live `LLMClient` refers to a reachable server.
pub struct LLMClient {
    backend: Arc<dyn LLMBackend>,
    retry: RetryPolicy,
}

impl LLMClient {
    /// Verify the backend is reachable and wrap it
    pub async fn connect(backend: Arc<dyn LLMBackend>, retry: RetryPolicy) -> Result<Self> {
        let settings = backend.settings();
        tracing::debug!(
            "Connecting to {} at {}",
            settings.provider.display_name(),
            settings.base_url
        );

        backend.health_check().await.map_err(|e| match e {
            PromptOptError::Connection(_) => e,
            other => PromptOptError::Connection(other.to_string()),
        })?;

        tracing::info!(
            "Connected to {} (model: {})",
            backend.settings().provider.display_name(),
            backend.model_name()
        );

        Ok(Self { backend, retry })
    }

    /// Build the HTTP backend described by the config and connect to it
    pub async fn from_config(config: &Config) -> Result<Self> {
        let backend = HttpBackend::new(config.llm.clone())?;
        Self::connect(Arc::new(backend), config.pipeline.retry_policy()).await
    }

    /// Generate text, making at most `retries` attempts
    ///
    /// `retries == 0` still makes one attempt. When every attempt fails the
    /// error is a [`PromptOptError::Connection`] carrying the last failure.
    pub async fn generate(&self, prompt: &str, retries: u32) -> Result<String> {
        let attempts = retries.max(1);
        let prompt = prompt.trim();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.backend.complete(prompt).await {
                Ok(text) => {
                    if attempt > 1 {
                        tracing::debug!("LLM call succeeded on attempt {}/{}", attempt, attempts);
                    }
                    return Ok(text);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt == attempts {
                        break;
                    }

                    let delay = if is_malformed_response(&last_error) {
                        tracing::warn!(
                            "Malformed response from model server (attempt {}/{}), retrying",
                            attempt,
                            attempts
                        );
                        self.retry.malformed_delay
                    } else {
                        tracing::warn!(
                            "LLM call failed (attempt {}/{}): {}",
                            attempt,
                            attempts,
                            last_error
                        );
                        self.retry.delay
                    };
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(PromptOptError::Connection(format!(
            "LLM call failed after {} attempt(s): {}",
            attempts, last_error
        )))
    }

    /// Generate text with the configured number of attempts
    pub async fn invoke(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, self.retry.attempts).await
    }

    /// Connection parameters of the underlying backend
    pub fn settings(&self) -> &ProviderConfig {
        self.backend.settings()
    }

    pub fn provider_info(&self) -> ProviderInfo {
        let settings = self.settings();
        ProviderInfo {
            provider: settings.provider,
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }
}
