use crate::analysis::patterns;
use crate::models::{SectionKind, SectionMap};

const ESSENTIAL: [SectionKind; 3] = [
    SectionKind::Experience,
    SectionKind::Skills,
    SectionKind::Education,
];
const RECOMMENDED: [SectionKind; 2] = [SectionKind::Summary, SectionKind::Contact];

const MIN_SECTION_WORDS: usize = 10;
const MIN_LISTED_SKILLS: usize = 5;

/// Lists missing or weak sections, in a fixed order. Messages are not de-duplicated.
pub fn identify_gaps(sections: &SectionMap) -> Vec<String> {
    let mut gaps = Vec::new();

    for kind in ESSENTIAL {
        match sections.get(&kind) {
            None => gaps.push(format!("Missing essential section: {kind}")),
            Some(section) if section.word_count() < MIN_SECTION_WORDS => {
                gaps.push(format!("Insufficient content in {kind} section"))
            }
            Some(_) => {}
        }
    }

    for kind in RECOMMENDED {
        if !sections.contains_key(&kind) {
            gaps.push(format!("Consider adding {kind} section"));
        }
    }

    if let Some(experience) = sections.get(&SectionKind::Experience) {
        if !patterns::DURATION.is_match(&experience.content) {
            gaps.push("Experience section lacks duration information".to_string());
        }
        if !patterns::BULLET_MARKER.is_match(&experience.content) {
            gaps.push("Experience section would benefit from bullet points".to_string());
        }
    }

    if let Some(skills) = sections.get(&SectionKind::Skills) {
        if skills.content.split(',').count() < MIN_LISTED_SKILLS {
            gaps.push(
                "Skills section appears limited - consider adding more relevant skills".to_string(),
            );
        }
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{extract_sections, TextStructure};

    #[test]
    fn test_empty_cv_reports_all_missing_sections() {
        let gaps = identify_gaps(&SectionMap::new());
        assert_eq!(
            gaps,
            vec![
                "Missing essential section: experience",
                "Missing essential section: skills",
                "Missing essential section: education",
                "Consider adding summary section",
                "Consider adding contact section",
            ]
        );
    }

    #[test]
    fn test_thin_sections_flagged() {
        let text = "SUMMARY\nDev.\nEXPERIENCE\nBuilt things.\nSKILLS\nPython";
        let gaps = identify_gaps(&extract_sections(text, TextStructure::Plain));
        assert!(gaps.contains(&"Insufficient content in experience section".to_string()));
        assert!(gaps.contains(&"Insufficient content in skills section".to_string()));
        assert!(gaps.contains(&"Missing essential section: education".to_string()));
        assert!(gaps.contains(&"Consider adding contact section".to_string()));
        assert!(!gaps.contains(&"Consider adding summary section".to_string()));
        assert!(gaps.contains(&"Experience section lacks duration information".to_string()));
        assert!(gaps.contains(&"Experience section would benefit from bullet points".to_string()));
        assert!(gaps.iter().any(|g| g.starts_with("Skills section appears limited")));
    }

    #[test]
    fn test_strong_experience_has_no_experience_gaps() {
        let text = "EXPERIENCE\nSenior engineer for 4 years at a payments company\n- Built the ledger service\n- Led incident response\nSKILLS\nRust, Go, SQL, Kafka, Docker, Linux";
        let gaps = identify_gaps(&extract_sections(text, TextStructure::Plain));
        assert!(!gaps.iter().any(|g| g.contains("experience")));
        assert!(!gaps.iter().any(|g| g.starts_with("Skills section")));
    }
}
