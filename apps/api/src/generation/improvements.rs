use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::generation::prompts::{improvement_prompt, jd_suggestion_prompt};
use crate::generation::suggestions::{parse_suggestions, ParsedSuggestion};
use crate::generation::{GenerationError, GenerationOutput, GenerationService, StructuredSections};
use crate::matching::JobMatchReport;
use crate::models::{Improvement, ImprovementKind, Priority};

const FALLBACK_IMPROVED_TEXT: &str = "Content needs enhancement for better impact";
const FALLBACK_CONFIDENCE: f64 = 0.5;

const BULLET_CHARS: &[char] = &['•', '▪', '*', '-'];
const COMMON_HEADERS: &[&str] = &["experience", "education", "skills", "summary"];

/// Section name carried by job-targeted suggestions.
pub const JOB_MATCH_SECTION: &str = "job_match";
const MAX_NAMED_MISSING_SKILLS: usize = 3;
const KEYWORD_OPTIMIZATION_THRESHOLD: f64 = 0.7;

/// Adapter between the pipeline and the generation collaborator.
///
/// Every call is bounded by `timeout`. Content suggestions never fail: a
/// collaborator error or timeout becomes a single generic improvement.
#[derive(Clone)]
pub struct ImprovementGenerator {
    service: Arc<dyn GenerationService>,
    timeout: Duration,
}

impl ImprovementGenerator {
    pub fn new(service: Arc<dyn GenerationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub async fn generate_improvements(
        &self,
        section: &str,
        content: &str,
        gaps: &[String],
        target_role: Option<&str>,
    ) -> Vec<Improvement> {
        let prompt = improvement_prompt(section, content, gaps, target_role);

        match self.bounded(self.service.suggest(&prompt)).await {
            Ok(GenerationOutput::Structured(records)) => {
                debug!(section, count = records.len(), "structured suggestions received");
                records
                    .into_iter()
                    .map(|record| record.into_improvement(section))
                    .collect()
            }
            Ok(GenerationOutput::Freeform(text)) => {
                let parsed = parse_suggestions(&text);
                debug!(section, count = parsed.len(), "free-form suggestions parsed");
                parsed
                    .into_iter()
                    .map(|suggestion| suggestion.into_improvement(section))
                    .collect()
            }
            Err(e) => {
                warn!(section, "improvement generation failed: {e}");
                vec![fallback_improvement(section, content, &e)]
            }
        }
    }

    /// Suggestions aimed at one job description. A collaborator failure
    /// switches to rule-based suggestions built from the match report.
    pub async fn generate_jd_suggestions(&self, report: &JobMatchReport) -> Vec<Improvement> {
        let prompt = jd_suggestion_prompt(report);

        let suggestions = match self.bounded(self.service.suggest(&prompt)).await {
            Ok(GenerationOutput::Structured(records)) => {
                return records
                    .into_iter()
                    .map(|record| record.into_improvement(JOB_MATCH_SECTION))
                    .collect();
            }
            Ok(GenerationOutput::Freeform(text)) => parse_suggestions(&text),
            Err(e) => {
                warn!(job_title = %report.job_title, "job-targeted suggestions failed, using rules: {e}");
                rule_based_jd_suggestions(report)
            }
        };

        debug!(count = suggestions.len(), "job-targeted suggestions ready");
        suggestions
            .into_iter()
            .map(|suggestion| suggestion.into_improvement(JOB_MATCH_SECTION))
            .collect()
    }

    /// Deterministic layout checks; no collaborator involved.
    pub fn generate_formatting_improvements(&self, raw_text: &str) -> Vec<Improvement> {
        formatting_improvements(raw_text)
    }

    pub async fn extract_sections(&self, text: &str) -> Result<StructuredSections, GenerationError> {
        self.bounded(self.service.extract_sections(text)).await
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, GenerationError>
    where
        F: Future<Output = Result<T, GenerationError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
    }
}

fn fallback_improvement(section: &str, content: &str, error: &GenerationError) -> Improvement {
    Improvement {
        section: section.to_string(),
        kind: ImprovementKind::Content,
        original_text: content.to_string(),
        improved_text: FALLBACK_IMPROVED_TEXT.to_string(),
        rationale: format!("Error generating specific improvements: {error}"),
        priority: Priority::Medium,
        confidence: FALLBACK_CONFIDENCE,
    }
}

fn rule_based_jd_suggestions(report: &JobMatchReport) -> Vec<ParsedSuggestion> {
    let mut suggestions = Vec::new();

    let missing = &report.technical.missing_skills;
    if !missing.is_empty() {
        let named = missing
            .iter()
            .take(MAX_NAMED_MISSING_SKILLS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        suggestions.push(ParsedSuggestion {
            title: "Add Missing Technical Skills".to_string(),
            reason: format!("Job requires {named} which are not highlighted in your CV"),
            action: format!("Add a skills section or update existing one to include: {named}"),
            priority: Priority::High,
            impact: "Significantly improves ATS matching and recruiter attention".to_string(),
        });
    }

    if report.experience.gap_years > 0 {
        suggestions.push(ParsedSuggestion {
            title: "Highlight Relevant Experience".to_string(),
            reason: format!(
                "Position requires {} years experience",
                report.experience.required_years
            ),
            action: "Emphasize transferable skills and relevant project experience to bridge the gap"
                .to_string(),
            priority: Priority::Medium,
            impact: "Helps compensate for experience requirements".to_string(),
        });
    }

    if report.overall_match < KEYWORD_OPTIMIZATION_THRESHOLD {
        suggestions.push(ParsedSuggestion {
            title: "Optimize Keywords for ATS".to_string(),
            reason: format!("Current match score is {:.0}%", report.overall_match * 100.0),
            action: "Incorporate more keywords from job description throughout your CV".to_string(),
            priority: Priority::High,
            impact: "Improves ATS screening and keyword matching".to_string(),
        });
    }

    suggestions
}

pub fn formatting_improvements(raw_text: &str) -> Vec<Improvement> {
    let mut improvements = Vec::new();

    if !raw_text.contains(BULLET_CHARS) {
        improvements.push(Improvement {
            section: "format".to_string(),
            kind: ImprovementKind::Format,
            original_text: "Plain text format".to_string(),
            improved_text: "Use bullet points for better readability".to_string(),
            rationale: "Bullet points improve ATS compatibility and readability".to_string(),
            priority: Priority::Medium,
            confidence: 0.90,
        });
    }

    let lower = raw_text.to_lowercase();
    let missing: Vec<&str> = COMMON_HEADERS
        .iter()
        .copied()
        .filter(|header| !lower.contains(header))
        .collect();

    if !missing.is_empty() {
        improvements.push(Improvement {
            section: "structure".to_string(),
            kind: ImprovementKind::Structure,
            original_text: "Current section organization".to_string(),
            improved_text: format!("Add clear section headers: {}", missing.join(", ")),
            rationale: "Clear section headers improve document structure and ATS parsing"
                .to_string(),
            priority: Priority::High,
            confidence: 0.95,
        });
    }

    improvements
}
