use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::JobMatchReport;
use crate::models::{Improvement, ScoreReport, SectionMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
    Txt,
    #[default]
    Unknown,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
            SourceFormat::Txt => "txt",
            SourceFormat::Unknown => "unknown",
        }
    }
}

/// Everything one pipeline invocation knows about a résumé.
///
/// The record is owned by a single invocation and only ever grows: `gaps` and
/// `errors` are append-only, and each stage contributes a [`RecordUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub source_input: String,
    pub source_format: SourceFormat,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
    pub job_description: Option<String>,
    pub raw_text: String,
    pub sections: SectionMap,
    pub scores: Option<ScoreReport>,
    pub gaps: Vec<String>,
    pub job_match: Option<JobMatchReport>,
    pub suggested_improvements: Vec<Improvement>,
    pub applied_improvements: Vec<Improvement>,
    pub final_text: Option<String>,
    pub final_summary: Option<String>,
    pub final_quality_score: Option<f64>,
    pub complete: bool,
    pub errors: Vec<String>,
    pub elapsed_seconds: Option<f64>,
}

impl ProcessingRecord {
    pub fn new(
        source_input: impl Into<String>,
        target_role: Option<String>,
        target_industry: Option<String>,
        job_description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            source_input: source_input.into(),
            source_format: SourceFormat::Unknown,
            target_role,
            target_industry,
            job_description,
            raw_text: String::new(),
            sections: SectionMap::new(),
            scores: None,
            gaps: Vec::new(),
            job_match: None,
            suggested_improvements: Vec::new(),
            applied_improvements: Vec::new(),
            final_text: None,
            final_summary: None,
            final_quality_score: None,
            complete: false,
            errors: Vec::new(),
            elapsed_seconds: None,
        }
    }

    /// Folds a stage's changes into the record. Fields the stage left as `None`
    /// are untouched; gaps and errors are appended.
    pub fn merge(mut self, update: RecordUpdate) -> Self {
        if let Some(format) = update.source_format {
            self.source_format = format;
        }
        if let Some(raw_text) = update.raw_text {
            self.raw_text = raw_text;
        }
        if let Some(sections) = update.sections {
            self.sections = sections;
        }
        if let Some(scores) = update.scores {
            self.scores = Some(scores);
        }
        if let Some(job_match) = update.job_match {
            self.job_match = Some(job_match);
        }
        if let Some(suggested) = update.suggested_improvements {
            self.suggested_improvements = suggested;
        }
        if let Some(applied) = update.applied_improvements {
            self.applied_improvements = applied;
        }
        if let Some(final_text) = update.final_text {
            self.final_text = Some(final_text);
        }
        if let Some(final_summary) = update.final_summary {
            self.final_summary = Some(final_summary);
        }
        if let Some(score) = update.final_quality_score {
            self.final_quality_score = Some(score);
        }
        self.complete |= update.complete;
        self.gaps.extend(update.gaps);
        self.errors.extend(update.errors);
        self
    }
}

/// The subset of a [`ProcessingRecord`] a single stage changed.
#[derive(Debug, Default)]
pub struct RecordUpdate {
    pub source_format: Option<SourceFormat>,
    pub raw_text: Option<String>,
    pub sections: Option<SectionMap>,
    pub scores: Option<ScoreReport>,
    pub job_match: Option<JobMatchReport>,
    pub suggested_improvements: Option<Vec<Improvement>>,
    pub applied_improvements: Option<Vec<Improvement>>,
    pub final_text: Option<String>,
    pub final_summary: Option<String>,
    pub final_quality_score: Option<f64>,
    pub complete: bool,
    pub gaps: Vec<String>,
    pub errors: Vec<String>,
}

impl RecordUpdate {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::default()
        }
    }
}
