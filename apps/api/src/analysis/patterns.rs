use std::sync::LazyLock;

use regex::Regex;

pub static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[•·▪▫◦‣⁃]|\*\s|-\s|^\d+\.\s").unwrap());

/// Bullet markers without the numbered-list form, used for the experience gap check.
pub static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•·▪▫◦‣⁃]|\*\s|-\s").unwrap());

pub static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|\d{1,2}/\d{1,2}/\d{2,4}|\d{4})\b",
    )
    .unwrap()
});

/// Ten-digit numbers with optional area-code parentheses and `-`, `.` or space separators.
pub static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap());

pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").unwrap()
});

/// Percentages, magnitudes ("3 million", "50k"), dollar amounts and "N+" counts.
pub static QUANTIFIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+%|\b\d+\s*(?:million|thousand|k|m)\b|\$\d+|\b\d+\+").unwrap()
});

pub static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*(?:year|month)").unwrap());

/// Section names whose presence as whole words counts toward ATS header coverage.
pub static ATS_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        "experience",
        "education",
        "skills",
        "summary",
        "contact",
        "projects",
        "certifications",
        "achievements",
    ]
    .iter()
    .map(|h| Regex::new(&format!(r"(?i)\b{h}\b")).unwrap())
    .collect()
});

pub const ACTION_VERBS: &[&str] = &[
    "achieved",
    "developed",
    "managed",
    "led",
    "created",
    "implemented",
    "improved",
    "increased",
    "reduced",
    "optimized",
    "delivered",
    "collaborated",
    "designed",
    "built",
    "analyzed",
    "executed",
];

pub const PROFESSIONAL_INDICATORS: &[&str] =
    &["experience", "skills", "education", "professional", "career"];

const TECHNOLOGY_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node.js",
    "aws",
    "docker",
    "kubernetes",
    "sql",
    "mongodb",
    "api",
    "microservices",
    "agile",
    "scrum",
    "git",
    "ci/cd",
    "devops",
    "machine learning",
    "ai",
];

const MARKETING_KEYWORDS: &[&str] = &[
    "seo",
    "sem",
    "google analytics",
    "social media",
    "content marketing",
    "campaign management",
    "lead generation",
    "conversion optimization",
    "brand management",
    "market research",
    "digital marketing",
];

const FINANCE_KEYWORDS: &[&str] = &[
    "financial analysis",
    "budgeting",
    "forecasting",
    "excel",
    "financial modeling",
    "risk management",
    "compliance",
    "audit",
    "tax",
    "investment analysis",
];

/// Keyword list for a known industry, matched case-insensitively.
pub fn industry_keywords(industry: &str) -> Option<&'static [&'static str]> {
    match industry.trim().to_lowercase().as_str() {
        "technology" => Some(TECHNOLOGY_KEYWORDS),
        "marketing" => Some(MARKETING_KEYWORDS),
        "finance" => Some(FINANCE_KEYWORDS),
        _ => None,
    }
}
