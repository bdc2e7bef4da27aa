//! JSON output formatter

use promptopt_core::PipelineOutcome;

/// Pretty-printed outcome, newline terminated
pub fn format_outcome(outcome: &PipelineOutcome) -> String {
    serde_json::to_string_pretty(outcome).unwrap_or_else(|_| fallback(outcome)) + "\n"
}

/// Single-line outcome, one per query in interactive mode
pub fn format_outcome_line(outcome: &PipelineOutcome) -> String {
    serde_json::to_string(outcome).unwrap_or_else(|_| fallback(outcome)) + "\n"
}

/// Failure shape for errors that happen before the pipeline runs
pub fn format_error(message: &str) -> String {
    let value = serde_json::json!({
        "success": false,
        "error": message,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default() + "\n"
}

fn fallback(outcome: &PipelineOutcome) -> String {
    format!(r#"{{"success":{}}}"#, outcome.success)
}
