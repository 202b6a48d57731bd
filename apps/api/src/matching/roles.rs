//! Role keyword tables for the requirement-matching stage.

const SOFTWARE_ENGINEER: &[&str] = &[
    "programming",
    "coding",
    "development",
    "software",
    "algorithms",
    "data structures",
    "debugging",
    "testing",
    "version control",
];

const DATA_SCIENTIST: &[&str] = &[
    "machine learning",
    "statistics",
    "python",
    "r",
    "sql",
    "data analysis",
    "visualization",
    "modeling",
    "pandas",
    "numpy",
    "scikit-learn",
];

const PRODUCT_MANAGER: &[&str] = &[
    "product strategy",
    "roadmap",
    "stakeholder management",
    "agile",
    "user experience",
    "market research",
    "analytics",
    "prioritization",
];

const MARKETING_MANAGER: &[&str] = &[
    "campaign management",
    "digital marketing",
    "seo",
    "sem",
    "analytics",
    "brand management",
    "content strategy",
    "lead generation",
];

const MAX_LISTED_KEYWORDS: usize = 5;

/// Exact, case-insensitive role lookup.
pub fn role_keywords(role: &str) -> Option<&'static [&'static str]> {
    match role.trim().to_lowercase().as_str() {
        "software engineer" => Some(SOFTWARE_ENGINEER),
        "data scientist" => Some(DATA_SCIENTIST),
        "product manager" => Some(PRODUCT_MANAGER),
        "marketing manager" => Some(MARKETING_MANAGER),
        _ => None,
    }
}

/// One gap listing up to five role keywords missing from the text, or `None`
/// when the role is unknown or nothing is missing.
pub fn role_keyword_gap(raw_text: &str, target_role: &str) -> Option<String> {
    let keywords = role_keywords(target_role)?;
    let text = raw_text.to_lowercase();

    let missing: Vec<&str> = keywords
        .iter()
        .copied()
        .filter(|keyword| !text.contains(keyword))
        .take(MAX_LISTED_KEYWORDS)
        .collect();

    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "Consider adding keywords relevant to {target_role}: {}",
        missing.join(", ")
    ))
}
