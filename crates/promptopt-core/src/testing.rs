//! Scripted backend for unit tests

use crate::config::ProviderConfig;
use crate::error::{PromptOptError, Result};
use crate::llm::LLMBackend;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend replaying a fixed list of replies, one per call
pub struct ScriptedBackend {
    config: ProviderConfig,
    healthy: bool,
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback_error: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<std::result::Result<&str, &str>>) -> Self {
        Self {
            config: ProviderConfig::default(),
            healthy: true,
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            fallback_error: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing(message: &str) -> Self {
        Self {
            fallback_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMBackend for ScriptedBackend {
    async fn health_check(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(PromptOptError::Connection("scripted backend is down".into()))
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(PromptOptError::Llm(message)),
            None => Err(PromptOptError::Llm(
                self.fallback_error
                    .clone()
                    .unwrap_or_else(|| "no scripted reply left".to_string()),
            )),
        }
    }

    fn settings(&self) -> &ProviderConfig {
        &self.config
    }
}
