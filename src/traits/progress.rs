use crate::models::stage::{ Stage, StageResult };

/// Observer for live progress of a run. Purely informational.
pub trait ProgressSink: Send + Sync {
    fn stage_started(&self, _stage: Stage) {}

    /// A chunk of model output as it arrives
    fn token(&self, _stage: Stage, _chunk: &str) {}

    fn stage_finished(&self, _stage: Stage, _result: &StageResult) {}
}

/// Sink that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}
