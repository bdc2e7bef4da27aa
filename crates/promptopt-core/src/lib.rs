//! promptopt Core Library
//!
//! Core functionality for promptopt, a query optimizer for locally hosted
//! language models.
//!
//! # Features
//! - Ollama and LM Studio backends with a liveness check and bounded retry
//! - LLM-backed query analysis (clarity, completeness, missing context)
//! - Prompt rewriting with word-overlap and sentence-shape heuristics
//! - A three-stage analyze, rewrite and respond pipeline with history

pub mod config;
pub mod error;
pub mod llm;
pub mod optimizer;
pub mod pipeline;

#[cfg(test)]
mod testing;

pub use config::{Config, DisplayConfig, PipelineConfig, ProviderConfig, ProviderKind};
pub use error::{exit_codes, Error, PromptOptError, Result};
pub use llm::{HttpBackend, LLMBackend, LLMClient, ProviderInfo, RetryPolicy};
pub use optimizer::{
    intent_preserved, is_well_formed, OptimizationStep, PromptRewriter, QueryAnalysis,
    QueryAnalyzer,
};
pub use pipeline::{
    NoopObserver, PipelineObserver, PipelineOutcome, PipelinePhase, PipelineRunner,
    PipelineStage, PipelineState, StepRecord,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "promptopt";
