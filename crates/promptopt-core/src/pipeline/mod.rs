//! Three-stage query pipeline
//!
//! `Start -> Analyzed -> Rewritten -> Responded -> End`, with a
//! [`PipelineState`] passed by value through each stage.

mod observer;
mod runner;
mod state;

pub use observer::{NoopObserver, PipelineObserver};
pub use runner::{PipelineRunner, INTENT_WARNING};
pub use state::{
    OutcomeDetail, PipelineOutcome, PipelinePhase, PipelineStage, PipelineState, StepRecord,
    END_KEY, START_KEY,
};
