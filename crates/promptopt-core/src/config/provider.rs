//! Model server provider settings

use crate::error::{PromptOptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Local model server kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Ollama native API
    Ollama,
    /// LM Studio local server (OpenAI-compatible API)
    #[serde(rename = "lmstudio")]
    LmStudio,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Ollama, ProviderKind::LmStudio];

    /// Identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::LmStudio => "lmstudio",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ollama => "Ollama",
            Self::LmStudio => "LM Studio",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434",
            Self::LmStudio => "http://localhost:1234",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Ollama => "llama2",
            Self::LmStudio => "local-model",
        }
    }

    /// Path probed by the liveness check
    pub fn health_path(&self) -> &'static str {
        match self {
            Self::Ollama => "/api/tags",
            Self::LmStudio => "/v1/models",
        }
    }

    /// Path of the text generation endpoint
    pub fn generate_path(&self) -> &'static str {
        match self {
            Self::Ollama => "/api/generate",
            Self::LmStudio => "/v1/completions",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = PromptOptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "lmstudio" | "lm-studio" | "lm_studio" => Ok(Self::LmStudio),
            other => {
                let supported: Vec<&str> = Self::ALL.iter().map(|kind| kind.as_str()).collect();
                Err(PromptOptError::Config(format!(
                    "Unsupported provider: {} (supported: {})",
                    other,
                    supported.join(", ")
                )))
            }
        }
    }
}

/// Connection parameters for a local model server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,

    pub model: String,

    /// Base URL of the server, without a trailing path
    pub base_url: String,

    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Timeout for a single generation request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    120
}

impl ProviderConfig {
    /// Defaults for a provider kind
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
        }
    }

    /// Join a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PromptOptError::Config("llm.model must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PromptOptError::Config(format!(
                "llm.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(PromptOptError::Config(format!(
                "llm.temperature must be between 0 and 1, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(PromptOptError::Config("llm.max_tokens must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(PromptOptError::Config("llm.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::for_provider(ProviderKind::Ollama)
    }
}
