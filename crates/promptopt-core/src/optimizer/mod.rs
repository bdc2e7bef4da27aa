//! Query analysis and prompt rewriting

mod analyzer;
mod heuristics;
mod prompts;
mod rewriter;
mod step;

pub use analyzer::{
    parse_analysis_response, validate_query, AnalysisField, QueryAnalysis, QueryAnalyzer,
    ANALYSIS_PLACEHOLDER, MAX_QUERY_CHARS,
};
pub use heuristics::{
    contains_hangul, intent_preserved, is_well_formed, sanitize_prompt_text,
    word_overlap_ratio, INTENT_THRESHOLD, MIN_WELL_FORMED_CHARS, MIN_WELL_FORMED_WORDS,
};
pub use prompts::{build_analysis_prompt, build_rewrite_prompt, PromptLanguage};
pub use rewriter::PromptRewriter;
pub use step::OptimizationStep;
