use serde::{Deserialize, Serialize};

/// Confidence above which a high-priority improvement is applied automatically.
pub const APPLY_CONFIDENCE_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementKind {
    Content,
    Format,
    Keyword,
    Structure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Lenient parse used for free-form generator output ("High", "medium priority", ...).
    pub fn parse_loose(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("high") {
            Priority::High
        } else if text.contains("low") {
            Priority::Low
        } else {
            Priority::Medium
        }
    }
}

/// A proposed edit to one section of the résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub section: String,
    pub kind: ImprovementKind,
    pub original_text: String,
    pub improved_text: String,
    pub rationale: String,
    pub priority: Priority,
    pub confidence: f64,
}

impl Improvement {
    /// High priority with confidence strictly above the apply threshold.
    pub fn qualifies_for_apply(&self) -> bool {
        self.priority == Priority::High && self.confidence > APPLY_CONFIDENCE_THRESHOLD
    }
}
