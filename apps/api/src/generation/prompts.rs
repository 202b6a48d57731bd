// Prompt constants for the generation boundary.
// Templates use `{placeholder}` markers replaced before sending.

use crate::matching::JobMatchReport;

/// System prompt for improvement suggestions.
pub const IMPROVEMENT_SYSTEM: &str = "You are an experienced CV reviewer and career coach. \
    You suggest concrete, truthful edits to CV sections. \
    Never invent employers, dates, degrees or metrics that are not implied by the text.";

/// System prompt for section extraction: enforces JSON-only output.
pub const SECTION_EXTRACTION_SYSTEM: &str = "You are a precise document parser. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Improvement prompt. Replace `{section}`, `{role_context}`, `{content}` and `{issues}`.
pub const IMPROVEMENT_PROMPT_TEMPLATE: &str = r#"Analyze this CV {section} section and provide specific improvements{role_context}.

Original content:
{content}

Identified issues:
{issues}

Return 2-3 improvements as a JSON array:
[
  {
    "type": "content|format|keyword|structure",
    "original_text": "exact text from the section to replace",
    "improved_text": "improved version",
    "reasoning": "why this improvement helps",
    "priority": "high|medium|low",
    "confidence": 0.85
  }
]

"original_text" must be copied verbatim from the section so the edit can be applied.
Focus on quantified achievements, stronger action verbs, clarity and relevant keywords.
If you cannot produce JSON, answer with blocks of the form:
**Suggestion 1: Title**
- **Why**: ...
- **Action**: ...
- **Priority**: High/Medium/Low
- **Impact**: ..."#;

/// Section extraction prompt. Replace `{text}`.
pub const SECTION_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Split the following CV into its sections.

Return a JSON object with this EXACT schema:
{
  "sections": [
    {"name": "experience", "content": "...", "confidence": 0.9, "section_type": "experience"}
  ],
  "document_type": "cv",
  "overall_confidence": 0.9
}

Use these section names where they apply: contact, summary, experience, education, skills,
projects, certifications, achievements, languages, references. Use "other" for anything else.
Copy section content verbatim.

CV:
{text}"#;

/// Job-targeted suggestion prompt. Replace `{context}`.
pub const JD_SUGGESTION_PROMPT_TEMPLATE: &str = r#"You are coaching a candidate applying for a specific job.
Based on this job analysis and CV matching data, provide 5-8 specific suggestions
that close the biggest gaps between the CV and the job requirements:

{context}

Provide actionable suggestions in this format:
**Suggestion 1: [Title]**
- **Why**: [Importance for this specific role]
- **Action**: [Specific implementation steps]
- **Priority**: [High/Medium/Low]
- **Impact**: [Expected outcome for this application]"#;

const NO_ISSUES: &str = "General improvement needed";
const MAX_CONTEXT_MISSING_SKILLS: usize = 5;

pub fn improvement_prompt(
    section: &str,
    content: &str,
    gaps: &[String],
    target_role: Option<&str>,
) -> String {
    let role_context = target_role
        .map(|role| format!(" for a {role} position"))
        .unwrap_or_default();
    let issues = if gaps.is_empty() {
        NO_ISSUES.to_string()
    } else {
        gaps.join(", ")
    };
    IMPROVEMENT_PROMPT_TEMPLATE
        .replace("{section}", section)
        .replace("{role_context}", &role_context)
        .replace("{issues}", &issues)
        .replace("{content}", content)
}

pub fn jd_suggestion_prompt(report: &JobMatchReport) -> String {
    let missing: Vec<&str> = report
        .missing_keywords
        .iter()
        .take(MAX_CONTEXT_MISSING_SKILLS)
        .map(String::as_str)
        .collect();
    let context = [
        format!("Job Title: {}", report.job_title),
        format!("Overall Match Score: {:.1}%", report.overall_match * 100.0),
        format!(
            "Technical Skills Match: {:.1}%",
            report.technical.match_percentage * 100.0
        ),
        format!("Missing Skills: {}", missing.join(", ")),
        format!("Experience Gap: {} years", report.experience.gap_years),
        format!("Key Gaps: {}", report.gaps.join("; ")),
    ]
    .join("\n");
    JD_SUGGESTION_PROMPT_TEMPLATE.replace("{context}", &context)
}

pub fn section_extraction_prompt(text: &str) -> String {
    SECTION_EXTRACTION_PROMPT_TEMPLATE.replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_prompt_fills_placeholders() {
        let prompt = improvement_prompt(
            "experience",
            "Built things",
            &["Experience section lacks duration information".to_string()],
            Some("Data Scientist"),
        );
        assert!(prompt.contains("CV experience section"));
        assert!(prompt.contains("for a Data Scientist position"));
        assert!(prompt.contains("Built things"));
        assert!(prompt.contains("lacks duration information"));
        assert!(!prompt.contains("{content}"));
    }

    #[test]
    fn test_jd_prompt_carries_match_context() {
        use crate::extraction::{extract_sections, TextStructure};
        use crate::matching::{match_job_description, parse_job_description};

        let report = match_job_description(
            &extract_sections("SKILLS\nPython", TextStructure::Plain),
            &parse_job_description("Job Title: Data Engineer\nMust have Python, SQL and AWS. 3 years."),
        );
        let prompt = jd_suggestion_prompt(&report);
        assert!(prompt.contains("Job Title: Data Engineer"));
        assert!(prompt.contains("Missing Skills: sql, aws"));
        assert!(prompt.contains("Experience Gap: 3 years"));
        assert!(prompt.contains("Key Gaps: Missing technical skills: sql, aws; Experience gap: 3 years short"));
        assert!(prompt.contains("**Suggestion 1: [Title]**"));
        assert!(!prompt.contains("{context}"));
    }

    #[test]
    fn test_improvement_prompt_without_gaps_or_role() {
        let prompt = improvement_prompt("skills", "Rust", &[], None);
        assert!(prompt.contains("General improvement needed"));
        assert!(prompt.contains("provide specific improvements."));
    }
}
