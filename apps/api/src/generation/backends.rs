//! Concrete generation backends.
//!
//! `LlmGenerationService` is used when an API key is configured;
//! `OfflineGenerationService` otherwise, which makes the adapter fall back on
//! every call.

use async_trait::async_trait;
use tracing::debug;

use crate::generation::prompts::{
    section_extraction_prompt, IMPROVEMENT_SYSTEM, SECTION_EXTRACTION_SYSTEM,
};
use crate::generation::{
    GenerationError, GenerationOutput, GenerationService, StructuredSections, SuggestionRecord,
};
use crate::llm_client::{strip_json_fences, LlmClient};

pub struct LlmGenerationService {
    llm: LlmClient,
}

impl LlmGenerationService {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl GenerationService for LlmGenerationService {
    async fn suggest(&self, prompt: &str) -> Result<GenerationOutput, GenerationError> {
        let text = self.llm.call_text(prompt, IMPROVEMENT_SYSTEM).await?;
        Ok(classify_output(text))
    }

    async fn extract_sections(&self, text: &str) -> Result<StructuredSections, GenerationError> {
        let prompt = section_extraction_prompt(text);
        Ok(self
            .llm
            .call_json::<StructuredSections>(&prompt, SECTION_EXTRACTION_SYSTEM)
            .await?)
    }
}

/// JSON arrays of records are structured; anything else is prose for the marker parser.
fn classify_output(text: String) -> GenerationOutput {
    match serde_json::from_str::<Vec<SuggestionRecord>>(strip_json_fences(&text)) {
        Ok(records) => GenerationOutput::Structured(records),
        Err(e) => {
            debug!("suggestion output is not a JSON record list ({e}); treating as prose");
            GenerationOutput::Freeform(text)
        }
    }
}

pub struct OfflineGenerationService;

const OFFLINE_REASON: &str = "no ANTHROPIC_API_KEY configured";

#[async_trait]
impl GenerationService for OfflineGenerationService {
    async fn suggest(&self, _prompt: &str) -> Result<GenerationOutput, GenerationError> {
        Err(GenerationError::Unavailable(OFFLINE_REASON.to_string()))
    }

    async fn extract_sections(&self, _text: &str) -> Result<StructuredSections, GenerationError> {
        Err(GenerationError::Unavailable(OFFLINE_REASON.to_string()))
    }
}
