//! Pipeline runner - analyze, rewrite, then answer the rewritten prompt

use super::{NoopObserver, PipelineObserver, PipelinePhase, PipelineStage, PipelineState};
use crate::llm::LLMClient;
use crate::optimizer::{intent_preserved, PromptRewriter, QueryAnalyzer};
use std::sync::Arc;
use std::time::Instant;

/// Warning emitted when a rewrite shares too few words with the query
pub const INTENT_WARNING: &str = "Rewritten prompt may not preserve the original intent";

/// Runs queries through the three-stage pipeline
///
/// Stages run one after another. A failing stage records its error in the
/// state and every later stage is skipped.
pub struct PipelineRunner {
    client: Arc<LLMClient>,
    analyzer: QueryAnalyzer,
    rewriter: PromptRewriter,
    history: Vec<PipelineState>,
}

impl PipelineRunner {
    pub fn new(client: Arc<LLMClient>) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(Arc::clone(&client)),
            rewriter: PromptRewriter::new(Arc::clone(&client)),
            client,
            history: Vec::new(),
        }
    }

    /// Process one query without progress reporting
    pub async fn run(&mut self, query: &str) -> PipelineState {
        self.run_observed(query, &mut NoopObserver).await
    }

    /// Process one query, reporting progress to `observer`
    ///
    /// Never fails: errors end up in [`PipelineState::error`].
    pub async fn run_observed(
        &mut self,
        query: &str,
        observer: &mut dyn PipelineObserver,
    ) -> PipelineState {
        observer.on_query(query);
        tracing::info!("Running pipeline for query ({} chars)", query.chars().count());

        let mut state = PipelineState::new(query);

        for stage in PipelineStage::ALL {
            state = if state.is_failed() {
                tracing::debug!("Skipping {} after earlier failure", stage);
                state
            } else {
                observer.on_stage_start(stage);
                self.execute_stage(stage, state, observer).await
            };
            state.phase = stage.target_phase();
            self.history.push(state.clone());
        }

        state.finish();

        match &state.error {
            Some(error) => tracing::warn!("Pipeline failed: {}", error),
            None => tracing::info!("Pipeline completed: {} steps", state.steps.len()),
        }

        state
    }

    async fn execute_stage(
        &mut self,
        stage: PipelineStage,
        state: PipelineState,
        observer: &mut dyn PipelineObserver,
    ) -> PipelineState {
        match stage {
            PipelineStage::Analyze => self.analyze_step(state, observer).await,
            PipelineStage::Rewrite => self.rewrite_step(state, observer).await,
            PipelineStage::Respond => self.respond_step(state, observer).await,
        }
    }

    async fn analyze_step(
        &mut self,
        mut state: PipelineState,
        observer: &mut dyn PipelineObserver,
    ) -> PipelineState {
        match self.analyzer.analyze(&state.query).await {
            Ok(analysis) => {
                tracing::debug!("Analysis: {:?}", analysis);
                observer.on_analysis(&analysis);
                state.analysis = Some(analysis);
                state.complete_stage(PipelineStage::Analyze);
            }
            Err(e) => {
                observer.on_stage_error(PipelineStage::Analyze, &e);
                state.fail(PipelineStage::Analyze, &e);
            }
        }
        state
    }

    async fn rewrite_step(
        &mut self,
        mut state: PipelineState,
        observer: &mut dyn PipelineObserver,
    ) -> PipelineState {
        let analysis = state.analysis.clone().unwrap_or_default();

        match self.rewriter.rewrite(&state.query, &analysis).await {
            Ok(rewritten) => {
                let preserved = intent_preserved(&state.query, &rewritten);
                if !preserved {
                    tracing::warn!("{}", INTENT_WARNING);
                    observer.on_warning(INTENT_WARNING);
                }

                observer.on_rewrite(&rewritten);
                state.rewritten_prompt = Some(rewritten);
                state.complete_stage(PipelineStage::Rewrite).intent_preserved = Some(preserved);
            }
            Err(e) => {
                observer.on_stage_error(PipelineStage::Rewrite, &e);
                state.fail(PipelineStage::Rewrite, &e);
            }
        }
        state
    }

    async fn respond_step(
        &mut self,
        mut state: PipelineState,
        observer: &mut dyn PipelineObserver,
    ) -> PipelineState {
        let prompt = state.rewritten_prompt.clone().unwrap_or_default();

        let started = Instant::now();
        match self.client.invoke(&prompt).await {
            Ok(response) => {
                let elapsed = started.elapsed();
                tracing::debug!("Response received in {:.2}s", elapsed.as_secs_f64());

                observer.on_response(&response, elapsed);
                state.response = Some(response);
                state.response_duration = Some(elapsed);
                state.complete_stage(PipelineStage::Respond).duration_ms =
                    Some(elapsed.as_millis() as u64);
            }
            Err(e) => {
                observer.on_stage_error(PipelineStage::Respond, &e);
                state.fail(PipelineStage::Respond, &e);
            }
        }
        state
    }

    /// Snapshots taken after every transition, oldest first
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }

    pub fn rewriter(&self) -> &PromptRewriter {
        &self.rewriter
    }

    /// Clear the analyzer and rewriter step logs
    pub fn clear_steps(&mut self) {
        self.analyzer.clear_steps();
        self.rewriter.clear_steps();
    }

    pub fn client(&self) -> &LLMClient {
        &self.client
    }

    /// Phase reached by the most recent snapshot
    pub fn last_phase(&self) -> Option<PipelinePhase> {
        self.history.last().map(|state| state.phase)
    }
}
