//! Parser for free-form suggestion text in the marker format:
//!
//! ```text
//! **Suggestion 1: Quantify results**
//! - **Why**: Numbers make impact concrete
//! - **Action**: Add metrics to each bullet
//! - **Priority**: High
//! - **Impact**: Stronger recruiter signal
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Improvement, ImprovementKind, Priority};

static SUGGESTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*\*suggestion\s*\d*\s*:\s*(.*?)\s*(?:\*\*)?$").unwrap());

static SUGGESTION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[-*•]\s*\*\*(why|action|priority|impact)\*\*\s*:\s*(.*)$").unwrap()
});

/// Confidence assigned to suggestions parsed from prose.
pub const FREEFORM_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSuggestion {
    pub title: String,
    pub reason: String,
    pub action: String,
    pub priority: Priority,
    pub impact: String,
}

impl ParsedSuggestion {
    /// Prose suggestions name no exact text, so `original_text` stays empty
    /// and the suggestion can never be applied automatically.
    pub fn into_improvement(self, section: &str) -> Improvement {
        Improvement {
            section: section.to_string(),
            kind: ImprovementKind::Content,
            original_text: String::new(),
            improved_text: format!("{}: {}", self.title, self.action),
            rationale: format!("{} (expected impact: {})", self.reason, self.impact),
            priority: self.priority,
            confidence: FREEFORM_CONFIDENCE,
        }
    }
}

#[derive(Default)]
struct Draft {
    title: String,
    reason: Option<String>,
    action: Option<String>,
    priority: Option<String>,
    impact: Option<String>,
}

impl Draft {
    fn finish(self) -> Option<ParsedSuggestion> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        if self.title.is_empty() {
            return None;
        }
        Some(ParsedSuggestion {
            title: self.title,
            reason: non_empty(self.reason)?,
            action: non_empty(self.action)?,
            priority: Priority::parse_loose(&non_empty(self.priority)?),
            impact: non_empty(self.impact)?,
        })
    }
}

/// Parses every complete suggestion in `text`. Suggestions missing any of
/// title, why, action, priority or impact are dropped; text without markers
/// yields nothing.
pub fn parse_suggestions(text: &str) -> Vec<ParsedSuggestion> {
    let mut parsed = Vec::new();
    let mut draft: Option<Draft> = None;

    for line in text.lines().map(str::trim) {
        if let Some(caps) = SUGGESTION_HEADER.captures(line) {
            if let Some(done) = draft.take().and_then(Draft::finish) {
                parsed.push(done);
            }
            draft = Some(Draft {
                title: caps[1].replace("**", "").trim().to_string(),
                ..Draft::default()
            });
            continue;
        }

        let (Some(current), Some(caps)) = (draft.as_mut(), SUGGESTION_FIELD.captures(line)) else {
            continue;
        };
        let value = Some(caps[2].trim().to_string());
        match caps[1].to_lowercase().as_str() {
            "why" => current.reason = value,
            "action" => current.action = value,
            "priority" => current.priority = value,
            _ => current.impact = value,
        }
    }

    if let Some(done) = draft.and_then(Draft::finish) {
        parsed.push(done);
    }
    parsed
}
