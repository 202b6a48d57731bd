//! The résumé processing pipeline.
//!
//! Stages run in a fixed order over one [`ProcessingRecord`]:
//! load_and_extract → analyze → match_requirements → generate_improvements →
//! (apply_improvements) → quality_check. Apply runs only when at least one
//! suggestion is high priority with confidence above the apply threshold.
//! A stage that fails records `"Error in {stage}: ..."` and the run carries on.

pub mod handlers;
pub mod observer;
pub mod report;
pub mod stages;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::extraction::ExtractionMode;
use crate::generation::{
    GenerationService, ImprovementGenerator, LlmGenerationService, OfflineGenerationService,
};
use crate::llm_client::{self, LlmClient};
use crate::loader::{CvInput, DocumentLoader};
use crate::models::{ProcessingRecord, RecordUpdate};

pub use observer::{PipelineObserver, Stage, TracingObserver};
pub use report::improvement_summary;

/// One invocation's inputs.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub input: CvInput,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
    pub job_description: Option<String>,
}

impl ProcessRequest {
    pub fn new(input: CvInput) -> Self {
        Self {
            input,
            target_role: None,
            target_industry: None,
            job_description: None,
        }
    }
}

/// Holds the collaborators; cheap to clone, safe to share across requests.
#[derive(Clone)]
pub struct Pipeline {
    loader: DocumentLoader,
    generator: ImprovementGenerator,
    extraction: ExtractionMode,
    observer: Arc<dyn PipelineObserver>,
}

impl Pipeline {
    pub fn new(loader: DocumentLoader, generator: ImprovementGenerator) -> Self {
        Self {
            loader,
            generator,
            extraction: ExtractionMode::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let service: Arc<dyn GenerationService> = match &config.anthropic_api_key {
            Some(key) => {
                let llm = LlmClient::new(key.clone(), config.generation_timeout)?;
                info!("LLM client initialized (model: {})", llm_client::MODEL);
                Arc::new(LlmGenerationService::new(llm))
            }
            None => {
                warn!("ANTHROPIC_API_KEY not set; improvement generation will fall back to generic suggestions");
                Arc::new(OfflineGenerationService)
            }
        };

        let generator = ImprovementGenerator::new(service, config.generation_timeout);
        let mode = if config.enhanced_extraction {
            ExtractionMode::ServiceBacked
        } else {
            ExtractionMode::Deterministic
        };

        Ok(Self::new(DocumentLoader::from_config(config), generator).with_extraction_mode(mode))
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_extraction_mode(mut self, mode: ExtractionMode) -> Self {
        self.extraction = mode;
        self
    }

    /// Runs the pipeline on a path or raw résumé text.
    pub async fn process(
        &self,
        cv_input: &str,
        target_role: Option<&str>,
        target_industry: Option<&str>,
    ) -> ProcessingRecord {
        self.process_request(ProcessRequest {
            input: CvInput::detect(cv_input),
            target_role: target_role.map(str::to_string),
            target_industry: target_industry.map(str::to_string),
            job_description: None,
        })
        .await
    }

    pub async fn process_request(&self, request: ProcessRequest) -> ProcessingRecord {
        let started = Instant::now();
        let mut record = ProcessingRecord::new(
            request.input.describe(),
            request.target_role,
            request.target_industry,
            request.job_description,
        );
        info!(id = %record.id, "processing CV");

        let t = Instant::now();
        let update =
            stages::load_and_extract(&self.loader, &self.generator, self.extraction, request.input)
                .await;
        record = self.finish(Stage::LoadAndExtract, record, update, t);

        let t = Instant::now();
        let update = guarded(Stage::Analyze, || stages::analyze(&record));
        record = self.finish(Stage::Analyze, record, update, t);

        let t = Instant::now();
        let update = guarded(Stage::MatchRequirements, || stages::match_requirements(&record));
        record = self.finish(Stage::MatchRequirements, record, update, t);

        let t = Instant::now();
        let update = stages::generate_improvements(&record, &self.generator).await;
        record = self.finish(Stage::GenerateImprovements, record, update, t);

        if stages::should_apply(&record) {
            let t = Instant::now();
            let update = guarded(Stage::ApplyImprovements, || stages::apply_improvements(&record));
            record = self.finish(Stage::ApplyImprovements, record, update, t);
        }

        let t = Instant::now();
        let update = guarded(Stage::QualityCheck, || stages::quality_check(&record));
        record = self.finish(Stage::QualityCheck, record, update, t);

        record.elapsed_seconds = Some(started.elapsed().as_secs_f64());
        info!(
            id = %record.id,
            sections = record.sections.len(),
            suggested = record.suggested_improvements.len(),
            applied = record.applied_improvements.len(),
            errors = record.errors.len(),
            elapsed_s = record.elapsed_seconds,
            "CV processing finished"
        );
        record
    }

    fn finish(
        &self,
        stage: Stage,
        record: ProcessingRecord,
        update: RecordUpdate,
        started: Instant,
    ) -> ProcessingRecord {
        let new_errors = update.errors.len();
        let record = record.merge(update);
        self.observer
            .on_stage_complete(stage, started.elapsed(), new_errors);
        record
    }
}

/// Runs a synchronous stage, turning a panic into a recorded stage error.
fn guarded(stage: Stage, run: impl FnOnce() -> RecordUpdate) -> RecordUpdate {
    catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "stage panicked".to_string());
        warn!(stage = stage.as_str(), "{message}");
        RecordUpdate::error(stages::stage_error(stage, message))
    })
}
