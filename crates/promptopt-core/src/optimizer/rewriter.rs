//! Prompt rewriter

use super::heuristics::sanitize_prompt_text;
use super::prompts::{build_rewrite_prompt, PromptLanguage};
use super::{OptimizationStep, QueryAnalysis};
use crate::error::Result;
use crate::llm::LLMClient;
use std::sync::Arc;

const STEP_NAME: &str = "prompt_rewrite";
const STEP_DESCRIPTION: &str = "Rewrite the query using its analysis";

/// Rewrites a query into a more specific prompt
pub struct PromptRewriter {
    client: Arc<LLMClient>,
    steps: Vec<OptimizationStep>,
}

impl PromptRewriter {
    pub fn new(client: Arc<LLMClient>) -> Self {
        Self {
            client,
            steps: Vec::new(),
        }
    }

    /// Ask the model for an improved version of `query`
    ///
    /// Returns the trimmed reply as is. The reply is not checked here; see
    /// [`intent_preserved`](super::intent_preserved) and
    /// [`is_well_formed`](super::is_well_formed).
    pub async fn rewrite(&mut self, query: &str, analysis: &QueryAnalysis) -> Result<String> {
        let language = PromptLanguage::detect(query);
        let prompt = build_rewrite_prompt(&sanitize_prompt_text(query), analysis, language);

        let response = self.client.invoke(&prompt).await?;
        let rewritten = response.trim().to_string();
        tracing::debug!("Rewritten prompt: {:?}", rewritten);

        self.steps.push(OptimizationStep::new(
            STEP_NAME,
            STEP_DESCRIPTION,
            query,
            rewritten.as_str(),
        ));

        Ok(rewritten)
    }

    pub fn steps(&self) -> &[OptimizationStep] {
        &self.steps
    }

    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }
}
