//! Generation boundary: the external text-generation collaborator and the
//! adapter that turns its output into [`Improvement`]s.
//!
//! The pipeline only ever talks to [`ImprovementGenerator`], which bounds every
//! call with a timeout and never lets a collaborator failure escape.

pub mod backends;
pub mod improvements;
pub mod prompts;
pub mod suggestions;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::{Improvement, ImprovementKind, Priority};

pub use backends::{LlmGenerationService, OfflineGenerationService};
pub use improvements::ImprovementGenerator;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service unavailable: {0}")]
    Unavailable(String),

    #[error("generation service timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("generation service failed: {0}")]
    Service(String),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        GenerationError::Service(e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator output shapes
// ────────────────────────────────────────────────────────────────────────────

/// One structured suggestion as emitted by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    #[serde(alias = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub original_text: String,
    pub improved_text: String,
    #[serde(alias = "reasoning", default)]
    pub rationale: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

const DEFAULT_RECORD_CONFIDENCE: f64 = 0.7;

impl SuggestionRecord {
    pub fn into_improvement(self, section: &str) -> Improvement {
        let kind = match self.kind.as_deref().map(str::to_lowercase).as_deref() {
            Some("format") => ImprovementKind::Format,
            Some("keyword") => ImprovementKind::Keyword,
            Some("structure") => ImprovementKind::Structure,
            _ => ImprovementKind::Content,
        };
        Improvement {
            section: section.to_string(),
            kind,
            original_text: self.original_text,
            improved_text: self.improved_text,
            rationale: self.rationale,
            priority: self
                .priority
                .as_deref()
                .map(Priority::parse_loose)
                .unwrap_or_default(),
            confidence: self
                .confidence
                .unwrap_or(DEFAULT_RECORD_CONFIDENCE)
                .clamp(0.0, 1.0),
        }
    }
}

/// What a `suggest` call produced: parsed records, or prose to run through
/// the marker parser.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Structured(Vec<SuggestionRecord>),
    Freeform(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSection {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub section_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredSections {
    pub sections: Vec<StructuredSection>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub overall_confidence: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The external text-generation collaborator. Implement this to swap backends
/// without touching the pipeline.
///
/// Carried by the pipeline as `Arc<dyn GenerationService>`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn suggest(&self, prompt: &str) -> Result<GenerationOutput, GenerationError>;

    async fn extract_sections(&self, text: &str) -> Result<StructuredSections, GenerationError>;
}
