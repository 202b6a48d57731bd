//! CV-to-JD fit: technical coverage, experience, education and keyword overlap.

use serde::{Deserialize, Serialize};

use crate::matching::jd_parser::{ParsedJobDescription, YEARS};
use crate::models::{Priority, SectionMap};

const EDUCATION_KEYWORDS: &[&str] = &["degree", "bachelor", "master", "phd", "diploma", "certification"];

const MAX_LISTED_MISSING_SKILLS: usize = 3;

/// Technical coverage below this makes skills a high-priority area.
const TECHNICAL_PRIORITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalMatch {
    pub match_percentage: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub meets_requirement: bool,
    pub cv_max_years: u32,
    pub required_years: u32,
    pub gap_years: u32,
}

/// An area of the CV worth working on first for this job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementPriority {
    pub area: String,
    pub priority: Priority,
    pub reason: String,
}

/// Full fit report for one CV against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchReport {
    pub job_title: String,
    pub overall_match: f64,
    pub technical: TechnicalMatch,
    pub experience: ExperienceMatch,
    pub has_relevant_education: bool,
    pub missing_keywords: Vec<String>,
    pub matching_keywords: Vec<String>,
    pub gaps: Vec<String>,
    pub improvement_priority: Vec<ImprovementPriority>,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// Matches the CV's section content against a parsed job description.
pub fn match_job_description(sections: &SectionMap, jd: &ParsedJobDescription) -> JobMatchReport {
    let cv_content = sections
        .values()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let technical = match_technical(&cv_content, jd);
    let experience = match_experience(&cv_content, jd);
    let has_relevant_education = EDUCATION_KEYWORDS.iter().any(|k| cv_content.contains(k));

    let (matching_keywords, missing_keywords): (Vec<String>, Vec<String>) = jd
        .requirements
        .iter()
        .map(|r| r.keyword.clone())
        .partition(|k| cv_content.contains(k.as_str()));

    let mut gaps = Vec::new();
    if !technical.missing_skills.is_empty() {
        let listed: Vec<&str> = technical
            .missing_skills
            .iter()
            .take(MAX_LISTED_MISSING_SKILLS)
            .map(String::as_str)
            .collect();
        gaps.push(format!("Missing technical skills: {}", listed.join(", ")));
    }
    if experience.gap_years > 0 {
        gaps.push(format!("Experience gap: {} years short", experience.gap_years));
    }

    let overall_match = overall_match(&technical, &experience, has_relevant_education);
    let improvement_priority = prioritize(&technical);

    JobMatchReport {
        job_title: jd.job_title.clone(),
        overall_match,
        technical,
        experience,
        has_relevant_education,
        missing_keywords,
        matching_keywords,
        gaps,
        improvement_priority,
    }
}

fn prioritize(technical: &TechnicalMatch) -> Vec<ImprovementPriority> {
    let mut priorities = Vec::new();
    if technical.match_percentage < TECHNICAL_PRIORITY_THRESHOLD {
        priorities.push(ImprovementPriority {
            area: "Technical Skills".to_string(),
            priority: Priority::High,
            reason: format!(
                "Only {:.0}% technical skills match",
                technical.match_percentage * 100.0
            ),
        });
    }
    priorities
}

fn match_technical(cv_content: &str, jd: &ParsedJobDescription) -> TechnicalMatch {
    let (matched, missing): (Vec<String>, Vec<String>) = jd
        .technical()
        .map(|r| r.keyword.clone())
        .partition(|k| cv_content.contains(k.as_str()));

    let total = matched.len() + missing.len();
    let match_percentage = if total == 0 {
        1.0
    } else {
        matched.len() as f64 / total as f64
    };

    TechnicalMatch {
        match_percentage,
        matched_skills: matched,
        missing_skills: missing,
    }
}

fn match_experience(cv_content: &str, jd: &ParsedJobDescription) -> ExperienceMatch {
    let cv_max_years = YEARS
        .captures_iter(cv_content)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let required_years = jd.required_experience_years.unwrap_or(0);

    ExperienceMatch {
        meets_requirement: cv_max_years >= required_years,
        cv_max_years,
        required_years,
        gap_years: required_years.saturating_sub(cv_max_years),
    }
}

/// 0.5 technical coverage + 0.3 experience + 0.2 education, with partial
/// credit (0.5 and 0.7) when experience or education fall short.
fn overall_match(technical: &TechnicalMatch, experience: &ExperienceMatch, education: bool) -> f64 {
    let experience_score = if experience.meets_requirement { 1.0 } else { 0.5 };
    let education_score = if education { 1.0 } else { 0.7 };
    let score = 0.5 * technical.match_percentage + 0.3 * experience_score + 0.2 * education_score;
    (score * 1000.0).round() / 1000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
