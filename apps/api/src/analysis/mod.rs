//! Deterministic quality and ATS scoring.
//!
//! Every score is a pure function of the sections and raw text, so the same
//! résumé always scores the same.

pub mod gaps;
pub mod patterns;

use indexmap::IndexMap;

use crate::models::score::{round3, ScoreWeights};
use crate::models::{ScoreReport, SectionKind, SectionMap};

pub use gaps::identify_gaps;

/// Keyword density when no known industry is given.
const NEUTRAL_KEYWORD_DENSITY: f64 = 0.5;

/// Word count at which a section's length score saturates.
fn ideal_word_count(kind: SectionKind) -> f64 {
    match kind {
        SectionKind::Summary => 50.0,
        SectionKind::Experience => 200.0,
        _ => 30.0,
    }
}

/// Builds the full score report for one résumé.
pub fn score(sections: &SectionMap, raw_text: &str, target_industry: Option<&str>) -> ScoreReport {
    let per_section: IndexMap<SectionKind, f64> = sections
        .iter()
        .map(|(kind, section)| (*kind, round3(content_score(*kind, &section.content))))
        .collect();

    let content_quality = if per_section.is_empty() {
        0.0
    } else {
        round3(per_section.values().sum::<f64>() / per_section.len() as f64)
    };
    let ats_compatibility = round3(ats_score(raw_text));
    let keyword_density = round3(keyword_density(raw_text, target_industry));
    let formatting = round3(formatting_score(raw_text));

    let overall = round3(ScoreWeights::default().combine(
        content_quality,
        ats_compatibility,
        keyword_density,
        formatting,
    ));

    ScoreReport {
        overall,
        per_section,
        ats_compatibility,
        keyword_density,
        formatting,
        content_quality,
    }
}

/// Length, action verbs and quantified results, weighted 0.3 / 0.3 / 0.4.
pub fn content_score(kind: SectionKind, content: &str) -> f64 {
    let content = content.to_lowercase();

    let words = content.split_whitespace().count() as f64;
    let length = (words / ideal_word_count(kind)).min(1.0) * 0.3;

    let verbs = patterns::ACTION_VERBS
        .iter()
        .filter(|verb| content.contains(*verb))
        .count() as f64;
    let verbs = (verbs / 5.0).min(1.0) * 0.3;

    let quantified = patterns::QUANTIFIED.find_iter(&content).count() as f64;
    let quantified = (quantified / 3.0).min(1.0) * 0.4;

    (length + verbs + quantified).min(1.0)
}

pub fn ats_score(raw_text: &str) -> f64 {
    let mut score = 0.0;

    if patterns::EMAIL.is_match(raw_text) {
        score += 0.2;
    }
    if patterns::PHONE.is_match(raw_text) {
        score += 0.2;
    }

    let dates = patterns::DATE.find_iter(raw_text).count() as f64;
    score += (dates / 5.0).min(1.0) * 0.2;

    let bullets = patterns::BULLET.find_iter(raw_text).count() as f64;
    score += (bullets / 10.0).min(1.0) * 0.2;

    let headers = patterns::ATS_HEADERS
        .iter()
        .filter(|header| header.is_match(raw_text))
        .count() as f64;
    score += (headers / 5.0).min(1.0) * 0.2;

    score.min(1.0)
}

/// Fraction of the industry's keyword list present in the text.
pub fn keyword_density(raw_text: &str, target_industry: Option<&str>) -> f64 {
    let Some(keywords) = target_industry.and_then(patterns::industry_keywords) else {
        return NEUTRAL_KEYWORD_DENSITY;
    };

    let text = raw_text.to_lowercase();
    let found = keywords.iter().filter(|k| text.contains(*k)).count();
    (found as f64 / keywords.len() as f64).min(1.0)
}

pub fn formatting_score(raw_text: &str) -> f64 {
    let mut score = 0.0;

    let total_lines = raw_text.split('\n').count();
    let non_empty_lines = raw_text.split('\n').filter(|l| !l.trim().is_empty()).count();

    if non_empty_lines > 10 {
        score += 0.3;
    }
    if total_lines as f64 > non_empty_lines as f64 * 1.2 {
        score += 0.2;
    }

    let words = raw_text.split_whitespace().count();
    if (300..=800).contains(&words) {
        score += 0.3;
    } else if words < 300 {
        score += 0.1;
    }

    let text = raw_text.to_lowercase();
    let indicators = patterns::PROFESSIONAL_INDICATORS
        .iter()
        .filter(|i| text.contains(*i))
        .count() as f64;
    score += (indicators / 3.0).min(1.0) * 0.2;

    score.min(1.0)
}
