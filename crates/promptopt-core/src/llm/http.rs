//! HTTP backends for local model servers (Ollama, LM Studio)

use super::LLMBackend;
use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{PromptOptError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Timeout for the liveness probe
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// LM Studio ignores the key but the OpenAI wire format expects one
const LM_STUDIO_API_KEY: &str = "lm-studio";

/// Backend talking to Ollama or LM Studio over HTTP
pub struct HttpBackend {
    http_client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpBackend {
    /// Create backend from provider settings
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(PromptOptError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl LLMBackend for HttpBackend {
    async fn health_check(&self) -> Result<()> {
        let url = self.config.endpoint(self.config.provider.health_path());
        tracing::debug!("Health check: GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                PromptOptError::Connection(format!(
                    "cannot reach {} at {}: {}",
                    self.config.provider.display_name(),
                    self.config.base_url,
                    e
                ))
            })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(PromptOptError::Connection(format!(
                "{} health check at {} returned HTTP {}",
                self.config.provider.display_name(),
                url,
                response.status()
            )));
        }

        Ok(())
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.config.endpoint(self.config.provider.generate_path());
        let body = build_request_body(&self.config, prompt);

        let mut req = self.http_client.post(&url).json(&body);
        if self.config.provider == ProviderKind::LmStudio {
            req = req.header("Authorization", format!("Bearer {}", LM_STUDIO_API_KEY));
        }

        tracing::debug!(
            "POST {} (model={}, prompt_chars={})",
            url,
            self.config.model,
            prompt.chars().count()
        );

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PromptOptError::Llm(format!(
                "{} returned HTTP {}: {}",
                self.config.provider.display_name(),
                status,
                extract_error_message(&text)
            )));
        }

        extract_completion_text(self.config.provider, &text)
    }

    fn settings(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Build the generation request body for a provider
pub fn build_request_body(config: &ProviderConfig, prompt: &str) -> serde_json::Value {
    match config.provider {
        ProviderKind::Ollama => json!({
            "model": config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": config.temperature,
                "num_predict": config.max_tokens,
            }
        }),
        ProviderKind::LmStudio => json!({
            "model": config.model,
            "prompt": prompt,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        }),
    }
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Pull the generated text out of a successful response body
pub fn extract_completion_text(provider: ProviderKind, body: &str) -> Result<String> {
    match provider {
        ProviderKind::Ollama => {
            let parsed: OllamaGenerateResponse = serde_json::from_str(body).map_err(|e| {
                PromptOptError::Llm(format!("invalid Ollama response: {}", e))
            })?;
            Ok(parsed.response)
        }
        ProviderKind::LmStudio => {
            let parsed: CompletionResponse = serde_json::from_str(body).map_err(|e| {
                PromptOptError::Llm(format!("invalid completion response: {}", e))
            })?;
            parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.text)
                .ok_or_else(|| PromptOptError::Llm("No choices in completion response".to_string()))
        }
    }
}

/// Best-effort error text from an error response body
///
/// Understands `{"error": "..."}` (Ollama) and `{"error": {"message": "..."}}`
/// (OpenAI-compatible); anything else is returned as-is.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value["error"].as_str() {
            return message.to_string();
        }
        if let Some(message) = value["error"]["message"].as_str() {
            return message.to_string();
        }
    }
    body.trim().to_string()
}
