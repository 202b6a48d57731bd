//! Header recognition: which lines open a new section, and which section they open.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::SectionKind;

/// Ordered header table. The first matching pattern wins, so "Academic Projects"
/// opens `education`, not `projects`.
static HEADER_PATTERNS: LazyLock<Vec<(SectionKind, Regex)>> = LazyLock::new(|| {
    vec![
        (
            SectionKind::Contact,
            Regex::new(r"(?i)\b(contact|personal\s+info(rmation)?|personal\s+details)\b").unwrap(),
        ),
        (
            SectionKind::Summary,
            Regex::new(r"(?i)\b(summary|profile|objective|about)\b").unwrap(),
        ),
        (
            SectionKind::Experience,
            Regex::new(r"(?i)\b(experience|employment|work\s+history)\b").unwrap(),
        ),
        (
            SectionKind::Education,
            Regex::new(r"(?i)\b(education|academic|qualifications)\b").unwrap(),
        ),
        (
            SectionKind::Skills,
            Regex::new(r"(?i)\b(skills|competencies)\b").unwrap(),
        ),
        (
            SectionKind::Projects,
            Regex::new(r"(?i)\b(projects|portfolio)\b").unwrap(),
        ),
        (
            SectionKind::Certifications,
            Regex::new(r"(?i)\b(certifications|certificates|licenses)\b").unwrap(),
        ),
        (
            SectionKind::Achievements,
            Regex::new(r"(?i)\b(achievements|accomplishments|awards)\b").unwrap(),
        ),
        (
            SectionKind::Languages,
            Regex::new(r"(?i)\b(languages|linguistic)\b").unwrap(),
        ),
        (
            SectionKind::References,
            Regex::new(r"(?i)\b(references|referees)\b").unwrap(),
        ),
    ]
});

/// How the extractor should read the incoming text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStructure {
    /// Raw text from a plain reader: every line is a header candidate.
    Plain,
    /// Markdown from the rich converter: only `#` and `##` headings are candidates.
    Markdown,
}

/// Returns the section a trimmed, non-blank line opens, if any.
pub fn match_header(line: &str, structure: TextStructure) -> Option<SectionKind> {
    let candidate = match structure {
        TextStructure::Plain => plain_candidate(line)?,
        TextStructure::Markdown => markdown_candidate(line)?,
    };

    HEADER_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(candidate))
        .map(|(kind, _)| *kind)
}

/// A labelled line such as `Skills: Rust, Go` is judged by its label only.
fn plain_candidate(line: &str) -> Option<&str> {
    let text = strip_decoration(line.trim_start_matches('#'));
    let label = match text.split_once(':') {
        Some((label, _)) => strip_decoration(label),
        None => text,
    };
    (!label.is_empty()).then_some(label)
}

fn markdown_candidate(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=2).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = strip_decoration(rest);
    (!text.is_empty()).then_some(text)
}

/// Strips surrounding whitespace, emphasis markers and one trailing colon.
fn strip_decoration(text: &str) -> &str {
    let is_emphasis = |c: char| c == '*' || c == '_';
    let text = text.trim().trim_matches(is_emphasis).trim();
    let text = text.strip_suffix(':').unwrap_or(text);
    text.trim().trim_matches(is_emphasis).trim()
}
