//! Prompt templates for the analyze and rewrite steps

use super::heuristics::contains_hangul;
use super::QueryAnalysis;

/// Language of the prompt templates sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptLanguage {
    English,
    Korean,
}

impl PromptLanguage {
    /// Korean when the text contains any Hangul syllable, English otherwise
    pub fn detect(text: &str) -> Self {
        if contains_hangul(text) {
            Self::Korean
        } else {
            Self::English
        }
    }
}

/// Build the analysis prompt for an already sanitized query
pub fn build_analysis_prompt(query: &str, language: PromptLanguage) -> String {
    match language {
        PromptLanguage::English => format!(
            r#"Analyze this query.

Query: {}

Rate each item from 1 to 10 and add a short note:
Clarity: <score> - <note>
Completeness: <score> - <note>
Context: <background information the query is missing>

Answer each item on one line, using the labels above."#,
            query
        ),
        PromptLanguage::Korean => format!(
            r#"질의를 분석하세요.

질의: {}

각 항목을 1-10점으로 평가하고 짧게 설명하세요:
명확성: <점수> - <설명>
완전성: <점수> - <설명>
컨텍스트: <질의에 빠진 배경 정보>

각 항목을 위 형식대로 한 줄로 답변하세요."#,
            query
        ),
    }
}

/// Build the rewrite prompt for an already sanitized query
pub fn build_rewrite_prompt(
    query: &str,
    analysis: &QueryAnalysis,
    language: PromptLanguage,
) -> String {
    match language {
        PromptLanguage::English => format!(
            r#"Improve this query.

Original: {}

Analysis:
{}

Make it more specific and clear while keeping the original intent.
Output only the improved query."#,
            query,
            analysis.render()
        ),
        PromptLanguage::Korean => format!(
            r#"질의를 개선하세요.

원본: {}

분석 결과:
{}

원래 의도를 유지하면서 더 구체적이고 명확하게 작성하세요.
개선된 질의만 출력하세요."#,
            query,
            analysis.render()
        ),
    }
}
