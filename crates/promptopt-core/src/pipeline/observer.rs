//! Progress hooks called by the pipeline runner

use super::PipelineStage;
use crate::error::PromptOptError;
use crate::optimizer::QueryAnalysis;
use std::time::Duration;

/// Receives progress notifications from [`super::PipelineRunner`]
///
/// Every method has an empty default so front-ends only implement what they
/// render.
pub trait PipelineObserver {
    fn on_query(&mut self, _query: &str) {}

    fn on_stage_start(&mut self, _stage: PipelineStage) {}

    fn on_analysis(&mut self, _analysis: &QueryAnalysis) {}

    fn on_rewrite(&mut self, _rewritten: &str) {}

    fn on_response(&mut self, _response: &str, _elapsed: Duration) {}

    /// Non-fatal problem, such as a rewrite that drifted from the query
    fn on_warning(&mut self, _message: &str) {}

    fn on_stage_error(&mut self, _stage: PipelineStage, _error: &PromptOptError) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
