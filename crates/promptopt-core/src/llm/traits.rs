//! LLM trait definitions

use crate::config::ProviderConfig;
use crate::error::Result;
use async_trait::async_trait;

/// A model server that can be probed and asked for one completion
///
/// Implementations perform exactly one attempt per call; retrying belongs to
/// [`LLMClient`](super::LLMClient).
#[async_trait]
pub trait LLMBackend: Send + Sync {
    /// Check that the server answers its liveness endpoint
    async fn health_check(&self) -> Result<()>;

    /// Generate text for a prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Connection parameters this backend was built from
    fn settings(&self) -> &ProviderConfig;

    /// Get model name
    fn model_name(&self) -> &str {
        &self.settings().model
    }
}
