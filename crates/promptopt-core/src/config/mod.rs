//! Configuration management

mod provider;

pub use provider::{ProviderConfig, ProviderKind};

use crate::error::{PromptOptError, Result};
use crate::llm::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the provider kind
pub const ENV_PROVIDER: &str = "PROMPTOPT_LLM_PROVIDER";
/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "PROMPTOPT_LLM_MODEL";
/// Environment variable overriding the server base URL
pub const ENV_URL: &str = "PROMPTOPT_LLM_URL";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Model server settings (required in config files)
    pub llm: ProviderConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Retry settings for model calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Attempts per model call
    pub retries: u32,

    /// Pause between attempts, in milliseconds
    pub retry_delay_ms: u64,

    /// Pause after a malformed-response error, in milliseconds
    pub malformed_retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay_ms: 2000,
            malformed_retry_delay_ms: 1000,
        }
    }
}

impl PipelineConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retries,
            delay: Duration::from_millis(self.retry_delay_ms),
            malformed_delay: Duration::from_millis(self.malformed_retry_delay_ms),
        }
    }
}

/// Terminal rendering preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_timestamps: bool,
    pub color_output: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            color_output: true,
        }
    }
}

impl Config {
    /// Defaults for a provider kind
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self {
            llm: ProviderConfig::for_provider(provider),
            ..Default::default()
        }
    }

    /// Load and validate config from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        Ok(config)
    }

    /// Parse and validate config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the file is absent or invalid
    ///
    /// `None` means the default path. A missing file is not an error; an
    /// unreadable or invalid one is logged and replaced by the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Invalid config file {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.llm.validate()
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Apply `PROMPTOPT_LLM_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PROVIDER) {
            match value.parse::<ProviderKind>() {
                Ok(kind) => self.set_provider(kind),
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_PROVIDER, e),
            }
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
        if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
            self.llm.base_url = url;
        }
    }

    /// Switch provider kind
    ///
    /// The base URL follows the new provider when it still points at the old
    /// provider's default.
    pub fn set_provider(&mut self, kind: ProviderKind) {
        if self.llm.provider == kind {
            return;
        }
        if self.llm.base_url == self.llm.provider.default_base_url() {
            self.llm.base_url = kind.default_base_url().to_string();
        }
        self.llm.provider = kind;
    }

    /// Reject configs that fail validation, keeping a reason for the caller
    pub fn checked(self) -> Result<Self> {
        self.validate().map_err(|e| match e {
            PromptOptError::Config(reason) => {
                PromptOptError::Config(format!("invalid configuration: {}", reason))
            }
            other => other,
        })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.model, "llama2");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.pipeline.retries, 3);
        assert!(config.display.show_timestamps);
        assert!(config.display.color_output);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
llm:
  provider: lmstudio
  model: mistral-7b
  base_url: http://localhost:1234
  temperature: 0.5
  max_tokens: 1000
pipeline:
  retries: 2
display:
  show_timestamps: false
  color_output: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.llm.provider, ProviderKind::LmStudio);
        assert_eq!(config.llm.model, "mistral-7b");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.pipeline.retries, 2);
        assert_eq!(config.pipeline.retry_delay_ms, 2000);
        assert!(!config.display.show_timestamps);
    }

    #[test]
    fn test_optional_sections_default() {
        let yaml = "llm:\n  provider: ollama\n  model: mistral\n  base_url: http://localhost:11434\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_missing_llm_section_is_error() {
        assert!(Config::from_yaml("display:\n  color_output: false\n").is_err());
    }

    #[test]
    fn test_missing_required_key_is_error() {
        let yaml = "llm:\n  provider: ollama\n  model: llama2\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_unknown_provider_is_error() {
        let yaml = "llm:\n  provider: openai\n  model: gpt\n  base_url: http://localhost:1\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(Some(&dir.path().join("absent.yml")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_invalid_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "llm:\n  provider: ollama\n  temperature: 3.0\n").unwrap();
        let config = Config::load_or_default(Some(&path));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let mut config = Config::for_provider(ProviderKind::LmStudio);
        config.llm.model = "qwen2.5-7b".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.llm.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_PROVIDER, "lmstudio"),
            (ENV_MODEL, "phi-3"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.provider, ProviderKind::LmStudio);
        assert_eq!(config.llm.model, "phi-3");
        // URL followed the provider because it was still the old default
        assert_eq!(config.llm.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_env_invalid_provider_ignored() {
        let mut config = Config::default();
        config.apply_env_from(|key| (key == ENV_PROVIDER).then(|| "gemini".to_string()));
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
    }

    #[test]
    fn test_set_provider_keeps_custom_url() {
        let mut config = Config::default();
        config.llm.base_url = "http://gpu-box:11434".to_string();
        config.set_provider(ProviderKind::LmStudio);
        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
    }

    #[test]
    fn test_checked_prefixes_reason_once() {
        let mut config = Config::default();
        config.llm.temperature = 1.5;

        let message = config.checked().unwrap_err().to_string();
        assert_eq!(
            message,
            "Configuration error: invalid configuration: llm.temperature must be between 0 and 1, got 1.5"
        );
        assert_eq!(message.matches("Configuration error").count(), 1);

        assert!(Config::default().checked().is_ok());
    }

    #[test]
    fn test_retry_policy_from_pipeline_config() {
        let policy = PipelineConfig::default().retry_policy();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
        assert_eq!(policy.malformed_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_sample_configs_parse() {
        let ollama = Config::from_yaml(include_str!("../../../../config/ollama.yml")).unwrap();
        assert_eq!(ollama, Config::for_provider(ProviderKind::Ollama));

        let lmstudio = Config::from_yaml(include_str!("../../../../config/lmstudio.yml")).unwrap();
        assert_eq!(lmstudio, Config::for_provider(ProviderKind::LmStudio));
    }
}
