//! Query analysis - rates clarity, completeness and missing context

use super::heuristics::sanitize_prompt_text;
use super::prompts::{build_analysis_prompt, PromptLanguage};
use super::OptimizationStep;
use crate::error::{PromptOptError, Result};
use crate::llm::LLMClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Longest query accepted, in characters
pub const MAX_QUERY_CHARS: usize = 5000;

/// Value of a field the model reply did not mention
pub const ANALYSIS_PLACEHOLDER: &str = "analyzing...";

const STEP_NAME: &str = "query_analysis";
const STEP_DESCRIPTION: &str = "Assess clarity and completeness of the user query";

/// The three fields extracted from an analysis reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisField {
    Clarity,
    Completeness,
    Context,
}

impl AnalysisField {
    /// Fields in rendering and matching order
    pub const ALL: [AnalysisField; 3] = [
        AnalysisField::Clarity,
        AnalysisField::Completeness,
        AnalysisField::Context,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::Completeness => "completeness",
            Self::Context => "context",
        }
    }

    /// Lowercase substrings that identify this field in a reply line
    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Clarity => &["clarity", "명확성"],
            Self::Completeness => &["completeness", "완전성"],
            Self::Context => &["context", "컨텍스트"],
        }
    }

    fn matches(&self, lowered_line: &str) -> bool {
        self.labels().iter().any(|label| lowered_line.contains(label))
    }
}

/// Analysis of a query, one free-text value per field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub clarity: String,
    pub completeness: String,
    pub context: String,
}

impl Default for QueryAnalysis {
    fn default() -> Self {
        Self {
            clarity: ANALYSIS_PLACEHOLDER.to_string(),
            completeness: ANALYSIS_PLACEHOLDER.to_string(),
            context: ANALYSIS_PLACEHOLDER.to_string(),
        }
    }
}

impl QueryAnalysis {
    pub fn get(&self, field: AnalysisField) -> &str {
        match field {
            AnalysisField::Clarity => &self.clarity,
            AnalysisField::Completeness => &self.completeness,
            AnalysisField::Context => &self.context,
        }
    }

    pub fn set(&mut self, field: AnalysisField, value: impl Into<String>) {
        let slot = match field {
            AnalysisField::Clarity => &mut self.clarity,
            AnalysisField::Completeness => &mut self.completeness,
            AnalysisField::Context => &mut self.context,
        };
        *slot = value.into();
    }

    /// `(key, value)` pairs in field order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        AnalysisField::ALL
            .iter()
            .map(|field| (field.key(), self.get(*field)))
            .collect()
    }

    /// Whether the reply left this field unset
    pub fn is_placeholder(&self, field: AnalysisField) -> bool {
        self.get(field) == ANALYSIS_PLACEHOLDER
    }

    /// One `- key: value` line per field
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|(key, value)| format!("- {}: {}", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reject queries the analyzer will not send to the model
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(PromptOptError::Validation(
            "cannot analyze an empty query".to_string(),
        ));
    }

    let length = query.chars().count();
    if length > MAX_QUERY_CHARS {
        return Err(PromptOptError::Validation(format!(
            "query is too long ({} characters, maximum {})",
            length, MAX_QUERY_CHARS
        )));
    }

    Ok(())
}

/// Extract field values from a free-text analysis reply
///
/// Each line is assigned to a field by the label before its first colon,
/// falling back to the first field whose label appears anywhere in the line.
/// The value is whatever follows the first colon, or the whole line without
/// one. Later lines overwrite earlier ones and unmatched fields keep
/// [`ANALYSIS_PLACEHOLDER`]. Never fails.
pub fn parse_analysis_response(response: &str) -> QueryAnalysis {
    let mut analysis = QueryAnalysis::default();

    for line in response.trim().lines() {
        let (label, value) = match line.split_once(':') {
            Some((head, rest)) => (Some(head), rest.trim()),
            None => (None, line.trim()),
        };

        let field = label
            .and_then(find_field)
            .or_else(|| find_field(line));
        if let Some(field) = field {
            analysis.set(field, value);
        }
    }

    analysis
}

fn find_field(text: &str) -> Option<AnalysisField> {
    let lowered = text.to_lowercase();
    AnalysisField::ALL.iter().copied().find(|f| f.matches(&lowered))
}

/// LLM-backed query analyzer
pub struct QueryAnalyzer {
    client: Arc<LLMClient>,
    steps: Vec<OptimizationStep>,
}

impl QueryAnalyzer {
    /// Create from LLM client
    pub fn new(client: Arc<LLMClient>) -> Self {
        Self {
            client,
            steps: Vec::new(),
        }
    }

    /// Analyze a query with the model
    ///
    /// Fails with a validation error before any model call when the query is
    /// blank or longer than [`MAX_QUERY_CHARS`].
    pub async fn analyze(&mut self, query: &str) -> Result<QueryAnalysis> {
        validate_query(query)?;

        let language = PromptLanguage::detect(query);
        let prompt = build_analysis_prompt(&sanitize_prompt_text(query), language);

        let response = self.client.invoke(&prompt).await?;
        let analysis = parse_analysis_response(&response);

        let unparsed = AnalysisField::ALL
            .iter()
            .filter(|f| analysis.is_placeholder(**f))
            .count();
        if unparsed > 0 {
            tracing::debug!(
                "Analysis reply left {} of 3 fields unparsed: {:?}",
                unparsed,
                response
            );
        }

        self.steps.push(OptimizationStep::new(
            STEP_NAME,
            STEP_DESCRIPTION,
            query,
            analysis.render(),
        ));

        Ok(analysis)
    }

    /// Calls recorded since the last clear
    pub fn steps(&self) -> &[OptimizationStep] {
        &self.steps
    }

    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }
}
