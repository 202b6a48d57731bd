use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named résumé sections recognised by the extractor. `Other` collects
/// everything that precedes the first recognised header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Languages,
    References,
    Other,
}

impl SectionKind {
    pub const ALL: [SectionKind; 11] = [
        SectionKind::Contact,
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Achievements,
        SectionKind::Languages,
        SectionKind::References,
        SectionKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Contact => "contact",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Achievements => "achievements",
            SectionKind::Languages => "languages",
            SectionKind::References => "references",
            SectionKind::Other => "other",
        }
    }

    /// Case-insensitive lookup by vocabulary name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous block of résumé text under one header.
///
/// Sections are replaced wholesale when edited; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: SectionKind,
    pub content: String,
    pub ordinal: usize,
    pub confidence: f64,
}

impl Section {
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Returns a copy of this section with new content; position and confidence are kept.
    pub fn with_content(&self, content: String) -> Self {
        Self {
            name: self.name,
            content,
            ordinal: self.ordinal,
            confidence: self.confidence,
        }
    }
}

/// Sections keyed by kind, iterated in document order.
pub type SectionMap = IndexMap<SectionKind, Section>;
