//! The pipeline stages. Each one reads the record and returns only what it
//! changed as a [`RecordUpdate`].

use tracing::{debug, warn};

use crate::analysis;
use crate::extraction::{self, ExtractionMode};
use crate::generation::ImprovementGenerator;
use crate::loader::{CvInput, DocumentLoader};
use crate::matching::{self, parse_job_description};
use crate::models::{ProcessingRecord, RecordUpdate, SectionKind, SectionMap, SourceFormat};
use crate::pipeline::Stage;

const NOTHING_APPLIED: &str = "No high-priority improvements applied";
const ENHANCED_QUALITY_SCORE: f64 = 0.85;
const BASELINE_QUALITY_SCORE: f64 = 0.70;

pub(crate) fn stage_error(stage: Stage, message: impl std::fmt::Display) -> String {
    format!("Error in {stage}: {message}")
}

/// Loads the document on a blocking thread, then extracts sections.
///
/// A load failure leaves an empty record (no text, unknown format, no
/// sections) plus one diagnostic.
pub async fn load_and_extract(
    loader: &DocumentLoader,
    generator: &ImprovementGenerator,
    mode: ExtractionMode,
    input: CvInput,
) -> RecordUpdate {
    let loader = loader.clone();
    let loaded = tokio::task::spawn_blocking(move || loader.load(&input)).await;

    let document = match loaded {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => return empty_document(stage_error(Stage::LoadAndExtract, e)),
        Err(e) => return empty_document(stage_error(Stage::LoadAndExtract, e)),
    };

    let mut errors = document.diagnostics;
    let sections = match mode {
        ExtractionMode::Deterministic => {
            extraction::extract_sections(&document.text, document.structure)
        }
        ExtractionMode::ServiceBacked => {
            let structured = generator
                .extract_sections(&document.text)
                .await
                .map_err(|e| e.to_string())
                .and_then(|s| {
                    extraction::sections_from_structured(s)
                        .ok_or_else(|| "service returned no sections".to_string())
                });
            match structured {
                Ok(sections) => sections,
                Err(reason) => {
                    warn!("enhanced extraction failed: {reason}");
                    errors.push(format!(
                        "Enhanced extraction failed, used pattern extraction: {reason}"
                    ));
                    extraction::extract_sections(&document.text, document.structure)
                }
            }
        }
    };

    RecordUpdate {
        source_format: Some(document.format),
        raw_text: Some(document.text),
        sections: Some(sections),
        errors,
        ..RecordUpdate::default()
    }
}

fn empty_document(error: String) -> RecordUpdate {
    warn!("{error}");
    RecordUpdate {
        source_format: Some(SourceFormat::Unknown),
        raw_text: Some(String::new()),
        sections: Some(SectionMap::new()),
        errors: vec![error],
        ..RecordUpdate::default()
    }
}

pub fn analyze(record: &ProcessingRecord) -> RecordUpdate {
    RecordUpdate {
        scores: Some(analysis::score(
            &record.sections,
            &record.raw_text,
            record.target_industry.as_deref(),
        )),
        gaps: analysis::identify_gaps(&record.sections),
        ..RecordUpdate::default()
    }
}

/// Role keyword coverage, plus job-description fit when one was supplied.
pub fn match_requirements(record: &ProcessingRecord) -> RecordUpdate {
    let mut update = RecordUpdate::default();

    if let Some(role) = record.target_role.as_deref() {
        update
            .gaps
            .extend(matching::role_keyword_gap(&record.raw_text, role));
    }

    if let Some(jd) = record.job_description.as_deref().filter(|jd| !jd.trim().is_empty()) {
        let report = matching::match_job_description(&record.sections, &parse_job_description(jd));
        debug!(overall = report.overall_match, "job description matched");
        update.gaps.extend(report.gaps.iter().cloned());
        update.job_match = Some(report);
    }

    update
}

/// Asks the generator about every non-empty section and, when a job
/// description was matched, for job-targeted suggestions. The deterministic
/// formatting checks come last.
pub async fn generate_improvements(
    record: &ProcessingRecord,
    generator: &ImprovementGenerator,
) -> RecordUpdate {
    let mut suggested = Vec::new();

    for (kind, section) in record.sections.iter().filter(|(_, s)| !s.content.trim().is_empty()) {
        let name = kind.as_str();
        let section_gaps: Vec<String> = record
            .gaps
            .iter()
            .filter(|gap| gap.to_lowercase().contains(name))
            .cloned()
            .collect();

        let improvements = generator
            .generate_improvements(name, &section.content, &section_gaps, record.target_role.as_deref())
            .await;
        suggested.extend(improvements);
    }

    if let Some(report) = &record.job_match {
        suggested.extend(generator.generate_jd_suggestions(report).await);
    }

    suggested.extend(generator.generate_formatting_improvements(&record.raw_text));

    RecordUpdate {
        suggested_improvements: Some(suggested),
        ..RecordUpdate::default()
    }
}

/// True when any suggestion is high priority with confidence above the threshold.
pub fn should_apply(record: &ProcessingRecord) -> bool {
    record
        .suggested_improvements
        .iter()
        .any(|improvement| improvement.qualifies_for_apply())
}

/// Applies each qualifying improvement whose `original_text` occurs in its
/// section, replacing the first occurrence. Anything else is skipped.
pub fn apply_improvements(record: &ProcessingRecord) -> RecordUpdate {
    let mut sections = record.sections.clone();
    let mut applied = Vec::new();

    for improvement in record
        .suggested_improvements
        .iter()
        .filter(|i| i.qualifies_for_apply())
    {
        let Some(kind) = SectionKind::from_name(&improvement.section) else {
            continue;
        };
        let Some(section) = sections.get(&kind) else {
            continue;
        };
        if improvement.original_text.is_empty() || !section.content.contains(&improvement.original_text) {
            continue;
        }

        let content = section
            .content
            .replacen(&improvement.original_text, &improvement.improved_text, 1);
        let replaced = section.with_content(content);
        sections.insert(kind, replaced);
        applied.push(improvement.clone());
    }

    let final_text = sections
        .iter()
        .map(|(kind, section)| format!("{}\n{}\n", kind.as_str().to_uppercase(), section.content))
        .collect::<Vec<_>>()
        .join("\n");

    let final_summary = if applied.is_empty() {
        NOTHING_APPLIED.to_string()
    } else {
        let lines: Vec<String> = applied.iter().map(|i| format!("- {}", i.rationale)).collect();
        format!("Applied improvements:\n{}", lines.join("\n"))
    };

    RecordUpdate {
        sections: Some(sections),
        applied_improvements: Some(applied),
        final_text: Some(final_text),
        final_summary: Some(final_summary),
        ..RecordUpdate::default()
    }
}

pub fn quality_check(record: &ProcessingRecord) -> RecordUpdate {
    let enhanced = record.final_text.is_some() && !record.applied_improvements.is_empty();
    RecordUpdate {
        final_quality_score: Some(if enhanced {
            ENHANCED_QUALITY_SCORE
        } else {
            BASELINE_QUALITY_SCORE
        }),
        complete: true,
        ..RecordUpdate::default()
    }
}
