use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::SectionKind;

/// Quality scores for one résumé. Every value lies in [0, 1] and is rounded to
/// three decimals when the report is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: f64,
    pub per_section: IndexMap<SectionKind, f64>,
    pub ats_compatibility: f64,
    pub keyword_density: f64,
    pub formatting: f64,
    pub content_quality: f64,
}

/// Weights of the overall score. They sum to 1.0 so the overall stays in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub content: f64,
    pub ats: f64,
    pub keyword: f64,
    pub formatting: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            content: 0.4,
            ats: 0.25,
            keyword: 0.2,
            formatting: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn combine(&self, content: f64, ats: f64, keyword: f64, formatting: f64) -> f64 {
        (self.content * content + self.ats * ats + self.keyword * keyword + self.formatting * formatting)
            .clamp(0.0, 1.0)
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
