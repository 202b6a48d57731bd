//! JD Parser: rule-based extraction of title, requirements and required
//! experience from a raw job description.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?im)^\s*job\s*title\s*[:\-]\s*(.+)$").unwrap(),
        Regex::new(r"(?im)^\s*position\s*[:\-]\s*(.+)$").unwrap(),
        Regex::new(r"(?im)^\s*role\s*[:\-]\s*(.+)$").unwrap(),
    ]
});

/// "5 years", "3+ yrs", "10-year".
pub(crate) static YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)[+\-\s]*(?:years?|yrs?)").unwrap());

const TECHNICAL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node.js",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "api",
    "database",
    "machine learning",
    "ai",
    "cloud",
];

const SOFT_SKILL_KEYWORDS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "analytical",
    "collaboration",
    "management",
    "mentoring",
    "presentation",
    "strategic",
];

const REQUIRED_MARKERS: &[&str] = &["required", "must have", "essential"];

const UNKNOWN_TITLE: &str = "Unknown Position";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    TechnicalSkills,
    SoftSkills,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Required,
    Preferred,
}

/// A single requirement found in the JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub category: RequirementCategory,
    pub keyword: String,
    pub importance: Importance,
}

/// Structured view of a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    pub job_title: String,
    pub requirements: Vec<JobRequirement>,
    pub required_experience_years: Option<u32>,
}

impl ParsedJobDescription {
    pub fn technical(&self) -> impl Iterator<Item = &JobRequirement> {
        self.requirements
            .iter()
            .filter(|r| r.category == RequirementCategory::TechnicalSkills)
    }
}

pub fn parse_job_description(jd_text: &str) -> ParsedJobDescription {
    let job_title = TITLE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(jd_text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let jd_lower = jd_text.to_lowercase();

    // The markers apply to the whole posting, not to individual skills.
    let technical_importance = if REQUIRED_MARKERS.iter().any(|m| jd_lower.contains(m)) {
        Importance::Required
    } else {
        Importance::Preferred
    };

    let technical = TECHNICAL_KEYWORDS
        .iter()
        .filter(|k| jd_lower.contains(*k))
        .map(|k| JobRequirement {
            category: RequirementCategory::TechnicalSkills,
            keyword: k.to_string(),
            importance: technical_importance,
        });

    let soft = SOFT_SKILL_KEYWORDS
        .iter()
        .filter(|k| jd_lower.contains(*k))
        .map(|k| JobRequirement {
            category: RequirementCategory::SoftSkills,
            keyword: k.to_string(),
            importance: Importance::Preferred,
        });

    let required_experience_years = YEARS
        .captures(jd_text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    ParsedJobDescription {
        job_title,
        requirements: technical.chain(soft).collect(),
        required_experience_years,
    }
}
