//! Records of analyzer and rewriter invocations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One analyzer or rewriter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStep {
    pub name: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub input: String,
    pub output: String,
}

impl OptimizationStep {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            timestamp: Utc::now(),
            input: input.into(),
            output: output.into(),
        }
    }
}
