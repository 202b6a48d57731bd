use std::fmt;
use std::time::Duration;

use tracing::info;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadAndExtract,
    Analyze,
    MatchRequirements,
    GenerateImprovements,
    ApplyImprovements,
    QualityCheck,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LoadAndExtract => "load_and_extract",
            Stage::Analyze => "analyze",
            Stage::MatchRequirements => "match_requirements",
            Stage::GenerateImprovements => "generate_improvements",
            Stage::ApplyImprovements => "apply_improvements",
            Stage::QualityCheck => "quality_check",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives a callback after every stage. `new_errors` counts the diagnostics
/// that stage added to the record.
pub trait PipelineObserver: Send + Sync {
    fn on_stage_complete(&self, stage: Stage, duration: Duration, new_errors: usize);
}

/// Default observer: one structured log line per stage.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage_complete(&self, stage: Stage, duration: Duration, new_errors: usize) {
        info!(
            stage = stage.as_str(),
            duration_ms = duration.as_millis() as u64,
            new_errors,
            "stage complete"
        );
    }
}
