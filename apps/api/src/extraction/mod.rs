//! Section extraction: turns raw résumé text into named, ordered sections.
//!
//! The deterministic extractor is a single forward pass over lines. The
//! service-backed mode asks the generation service for sections and falls back
//! to the deterministic pass whenever that yields nothing usable.

pub mod headers;

use tracing::debug;

use crate::generation::StructuredSections;
use crate::models::{Section, SectionKind, SectionMap};

pub use headers::TextStructure;

const PLAIN_CONFIDENCE: f64 = 0.8;
const MARKDOWN_BASE_CONFIDENCE: f64 = 0.9;
const MARKDOWN_CONFIDENCE_STEP: f64 = 0.01;

/// Which extractor the pipeline uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    #[default]
    Deterministic,
    ServiceBacked,
}

/// Splits `text` into sections in document order.
///
/// Lines before the first recognised header land in `other`. A header that
/// appears twice replaces the earlier section's content but keeps its place
/// in the map.
pub fn extract_sections(text: &str, structure: TextStructure) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current = SectionKind::Other;
    let mut buffer: Vec<&str> = Vec::new();
    let mut position = 0;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match headers::match_header(line, structure) {
            Some(kind) => {
                if !buffer.is_empty() {
                    flush(&mut sections, current, &buffer, position, structure);
                    position += 1;
                }
                buffer = vec![line];
                current = kind;
            }
            None => buffer.push(line),
        }
    }

    if !buffer.is_empty() {
        flush(&mut sections, current, &buffer, position, structure);
    }

    debug!(count = sections.len(), ?structure, "extracted sections");
    sections
}

fn flush(
    sections: &mut SectionMap,
    kind: SectionKind,
    lines: &[&str],
    ordinal: usize,
    structure: TextStructure,
) {
    let content = lines.join("\n");
    let confidence = confidence_for(&content, structure);
    sections.insert(
        kind,
        Section {
            name: kind,
            content,
            ordinal,
            confidence,
        },
    );
}

fn confidence_for(content: &str, structure: TextStructure) -> f64 {
    match structure {
        TextStructure::Plain => PLAIN_CONFIDENCE,
        TextStructure::Markdown => {
            let hundreds = content.split_whitespace().count() / 100;
            (MARKDOWN_BASE_CONFIDENCE + MARKDOWN_CONFIDENCE_STEP * hundreds as f64).min(1.0)
        }
    }
}

/// Converts the generation service's section list into a [`SectionMap`].
///
/// Unknown names go to `other`; empty sections are dropped. Returns `None`
/// when nothing usable remains so the caller can fall back.
pub fn sections_from_structured(structured: StructuredSections) -> Option<SectionMap> {
    let mut sections = SectionMap::new();
    for entry in structured.sections {
        let content = entry.content.trim();
        if content.is_empty() {
            continue;
        }
        let kind = SectionKind::from_name(&entry.name)
            .or_else(|| entry.section_type.as_deref().and_then(SectionKind::from_name))
            .unwrap_or(SectionKind::Other);
        let ordinal = sections.get_index_of(&kind).unwrap_or(sections.len());
        sections.insert(
            kind,
            Section {
                name: kind,
                content: content.to_string(),
                ordinal,
                confidence: entry.confidence.clamp(0.0, 1.0),
            },
        );
    }
    (!sections.is_empty()).then_some(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::StructuredSection;

    const SAMPLE_CV: &str = "John Doe
Email: john.doe@example.com
Phone: (555) 123-4567

PROFESSIONAL SUMMARY
Software developer with 5+ years building web applications.

WORK EXPERIENCE
Senior Software Developer at Tech Company
- Led development of microservices architecture
- Improved system performance by 40%

EDUCATION
Bachelor's Degree in Computer Science
University of Technology, 2019

TECHNICAL SKILLS
Programming: Python, JavaScript, Java
Databases: PostgreSQL, MongoDB

CERTIFICATIONS
AWS Certified Developer Associate

LANGUAGES
English: Native
";

    fn kinds(sections: &SectionMap) -> Vec<SectionKind> {
        sections.keys().copied().collect()
    }

    #[test]
    fn test_simple_document_ordinals() {
        let sections = extract_sections(
            "SUMMARY\nDev.\nEXPERIENCE\nBuilt things.\nSKILLS\nPython",
            TextStructure::Plain,
        );
        assert_eq!(
            kinds(&sections),
            vec![SectionKind::Summary, SectionKind::Experience, SectionKind::Skills]
        );
        let ordinals: Vec<usize> = sections.values().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(sections[&SectionKind::Summary].content, "SUMMARY\nDev.");
        assert!(sections.values().all(|s| s.confidence == 0.8));
    }

    #[test]
    fn test_sample_cv_sections() {
        let sections = extract_sections(SAMPLE_CV, TextStructure::Plain);
        assert_eq!(
            kinds(&sections),
            vec![
                SectionKind::Other,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Certifications,
                SectionKind::Languages,
            ]
        );
        assert!(sections[&SectionKind::Other].content.starts_with("John Doe"));
        assert!(sections[&SectionKind::Experience]
            .content
            .contains("Improved system performance by 40%"));
        assert!(sections[&SectionKind::Skills]
            .content
            .ends_with("Databases: PostgreSQL, MongoDB"));
    }

    #[test]
    fn test_labelled_header_line_opens_section() {
        let sections = extract_sections(
            "SUMMARY\nBackend dev.\nSkills: Python, Rust, Go, SQL, Docker",
            TextStructure::Plain,
        );
        assert_eq!(kinds(&sections), vec![SectionKind::Summary, SectionKind::Skills]);
        assert_eq!(sections[&SectionKind::Summary].content, "SUMMARY\nBackend dev.");
        assert_eq!(
            sections[&SectionKind::Skills].content,
            "Skills: Python, Rust, Go, SQL, Docker"
        );
    }

    #[test]
    fn test_long_heading_opens_section() {
        let text = "Jane Roe\nProfessional Experience and Technical Leadership Roles\n- Led the platform team";
        let sections = extract_sections(text, TextStructure::Plain);
        assert_eq!(kinds(&sections), vec![SectionKind::Other, SectionKind::Experience]);
        assert!(sections[&SectionKind::Experience]
            .content
            .ends_with("- Led the platform team"));
    }

    #[test]
    fn test_no_headers_yields_single_other_section() {
        let text = "Just a paragraph of text\nwith two lines that say nothing special at all";
        let sections = extract_sections(text, TextStructure::Plain);
        assert_eq!(kinds(&sections), vec![SectionKind::Other]);
        assert_eq!(sections[&SectionKind::Other].ordinal, 0);
    }

    #[test]
    fn test_empty_text_yields_no_sections() {
        assert!(extract_sections("", TextStructure::Plain).is_empty());
        assert!(extract_sections("\n  \n", TextStructure::Plain).is_empty());
    }

    #[test]
    fn test_repeated_header_overwrites_in_place() {
        let text = "SKILLS\nRust\nEDUCATION\nBSc\nSKILLS\nGo";
        let sections = extract_sections(text, TextStructure::Plain);
        assert_eq!(kinds(&sections), vec![SectionKind::Skills, SectionKind::Education]);
        assert_eq!(sections[&SectionKind::Skills].content, "SKILLS\nGo");
        assert_eq!(sections[&SectionKind::Skills].ordinal, 2);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract_sections(SAMPLE_CV, TextStructure::Plain);
        let second = extract_sections(SAMPLE_CV, TextStructure::Plain);
        assert_eq!(first, second);
    }

    #[test]
    fn test_markdown_confidence_and_subheadings() {
        let markdown = "# John Doe\n\n## Work Experience\n### Senior Developer at Tech Company\n- Built APIs\n\n## Skills\nPython, Rust";
        let sections = extract_sections(markdown, TextStructure::Markdown);
        assert_eq!(
            kinds(&sections),
            vec![SectionKind::Other, SectionKind::Experience, SectionKind::Skills]
        );
        assert!(sections[&SectionKind::Experience]
            .content
            .contains("### Senior Developer at Tech Company"));
        assert!(sections.values().all(|s| s.confidence >= 0.9 && s.confidence <= 1.0));
    }

    #[test]
    fn test_markdown_confidence_grows_with_length() {
        let body = "word ".repeat(250);
        let markdown = format!("## Summary\n{body}");
        let sections = extract_sections(&markdown, TextStructure::Markdown);
        let confidence = sections[&SectionKind::Summary].confidence;
        assert!((confidence - 0.92).abs() < 1e-9, "got {confidence}");
    }

    #[test]
    fn test_structured_sections_conversion() {
        let structured = StructuredSections {
            sections: vec![
                StructuredSection {
                    name: "Experience".to_string(),
                    content: "Built things".to_string(),
                    confidence: 1.4,
                    section_type: None,
                },
                StructuredSection {
                    name: "Hobbies".to_string(),
                    content: "Chess".to_string(),
                    confidence: 0.6,
                    section_type: None,
                },
                StructuredSection {
                    name: "Skills".to_string(),
                    content: "   ".to_string(),
                    confidence: 0.9,
                    section_type: None,
                },
            ],
            document_type: Some("resume".to_string()),
            overall_confidence: Some(0.9),
        };
        let sections = sections_from_structured(structured).unwrap();
        assert_eq!(kinds(&sections), vec![SectionKind::Experience, SectionKind::Other]);
        assert_eq!(sections[&SectionKind::Experience].confidence, 1.0);
        assert_eq!(sections[&SectionKind::Other].ordinal, 1);
    }

    #[test]
    fn test_structured_sections_empty_is_none() {
        let structured = StructuredSections {
            sections: vec![],
            document_type: None,
            overall_confidence: None,
        };
        assert!(sections_from_structured(structured).is_none());
    }
}
