//! State record threaded through the pipeline

use crate::error::{exit_codes, PromptOptError};
use crate::optimizer::QueryAnalysis;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Timestamp key written when a state is created
pub const START_KEY: &str = "start";

/// Timestamp key written when a run finishes
pub const END_KEY: &str = "end";

/// The three model-backed stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Analyze,
    Rewrite,
    Respond,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 3] = [
        PipelineStage::Analyze,
        PipelineStage::Rewrite,
        PipelineStage::Respond,
    ];

    /// Name used for step records and timestamp keys
    pub fn name(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Rewrite => "rewrite",
            Self::Respond => "respond",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> usize {
        match self {
            Self::Analyze => 1,
            Self::Rewrite => 2,
            Self::Respond => 3,
        }
    }

    /// Phase reached once this stage's transition has run
    pub fn target_phase(&self) -> PipelinePhase {
        match self {
            Self::Analyze => PipelinePhase::Analyzed,
            Self::Rewrite => PipelinePhase::Rewritten,
            Self::Respond => PipelinePhase::Responded,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positions of the pipeline state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePhase {
    Start,
    Analyzed,
    Rewritten,
    Responded,
    End,
}

/// Entry appended for every stage that completed its work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    /// Rewrite stage only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_preserved: Option<bool>,
    /// Respond stage only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl StepRecord {
    pub fn new(stage: PipelineStage, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: stage.name().to_string(),
            timestamp,
            intent_preserved: None,
            duration_ms: None,
        }
    }
}

/// Everything known about one query's trip through the pipeline
///
/// Once `error` is set no later stage does any work and no further step
/// records are added. The phase still advances so the history shows every
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineState {
    pub query: String,
    pub analysis: Option<QueryAnalysis>,
    pub rewritten_prompt: Option<String>,
    pub response: Option<String>,
    pub timestamps: BTreeMap<String, DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
    pub error: Option<String>,
    pub phase: PipelinePhase,
    pub failed_stage: Option<PipelineStage>,
    /// The failing stage could not reach the model server
    pub connection_failure: bool,
    pub response_duration: Option<Duration>,
}

impl PipelineState {
    /// Fresh state for `query`, stamped with the start time
    pub fn new(query: impl Into<String>) -> Self {
        let mut timestamps = BTreeMap::new();
        timestamps.insert(START_KEY.to_string(), Utc::now());

        Self {
            query: query.into(),
            analysis: None,
            rewritten_prompt: None,
            response: None,
            timestamps,
            steps: Vec::new(),
            error: None,
            phase: PipelinePhase::Start,
            failed_stage: None,
            connection_failure: false,
            response_duration: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Finished without error and with a response
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.response.is_some()
    }

    /// Process exit code for this run
    ///
    /// A stage that ran out of connection attempts maps to the connection
    /// code; any other failure is a general error.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            exit_codes::SUCCESS
        } else if self.connection_failure {
            exit_codes::CONNECTION_ERROR
        } else {
            exit_codes::GENERAL_ERROR
        }
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.timestamps.get(key).copied()
    }

    /// Stamp `stage` and append its step record, returning the record
    pub(crate) fn complete_stage(&mut self, stage: PipelineStage) -> &mut StepRecord {
        let now = Utc::now();
        self.timestamps.insert(stage.name().to_string(), now);
        self.steps.push(StepRecord::new(stage, now));
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    pub(crate) fn fail(&mut self, stage: PipelineStage, error: &PromptOptError) {
        self.error = Some(format!("{} failed: {}", stage.name(), error));
        self.failed_stage = Some(stage);
        self.connection_failure = error.is_connection();
    }

    pub(crate) fn finish(&mut self) {
        self.timestamps.insert(END_KEY.to_string(), Utc::now());
        self.phase = PipelinePhase::End;
    }

    /// Wall-clock time between the start and end stamps
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.timestamp(END_KEY)? - self.timestamp(START_KEY)?)
    }
}

/// Result shape reported to callers and printed by `--format json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutcome {
    pub success: bool,
    #[serde(flatten)]
    pub detail: OutcomeDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutcomeDetail {
    Completed {
        original_query: String,
        rewritten_prompt: String,
        response: String,
        analysis: QueryAnalysis,
        /// RFC 3339 strings keyed by stage
        timestamps: BTreeMap<String, String>,
    },
    Failed {
        error: String,
    },
}

impl PipelineOutcome {
    pub fn error(&self) -> Option<&str> {
        match &self.detail {
            OutcomeDetail::Failed { error } => Some(error),
            OutcomeDetail::Completed { .. } => None,
        }
    }
}

impl From<&PipelineState> for PipelineOutcome {
    fn from(state: &PipelineState) -> Self {
        if let Some(error) = &state.error {
            return Self {
                success: false,
                detail: OutcomeDetail::Failed {
                    error: error.clone(),
                },
            };
        }

        match (&state.analysis, &state.rewritten_prompt, &state.response) {
            (Some(analysis), Some(rewritten), Some(response)) => Self {
                success: true,
                detail: OutcomeDetail::Completed {
                    original_query: state.query.clone(),
                    rewritten_prompt: rewritten.clone(),
                    response: response.clone(),
                    analysis: analysis.clone(),
                    timestamps: state
                        .timestamps
                        .iter()
                        .map(|(key, time)| (key.clone(), time.to_rfc3339()))
                        .collect(),
                },
            },
            _ => Self {
                success: false,
                detail: OutcomeDetail::Failed {
                    error: "pipeline did not complete".to_string(),
                },
            },
        }
    }
}
