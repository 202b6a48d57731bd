use crate::models::ProcessingRecord;

const LISTED_GAPS: usize = 3;

/// Human-readable digest of a finished record.
pub fn improvement_summary(record: &ProcessingRecord) -> String {
    let mut parts = Vec::new();

    if let Some(scores) = &record.scores {
        parts.push(format!("Overall CV Score: {:.1}%", scores.overall * 100.0));
    }

    if !record.gaps.is_empty() {
        parts.push(format!("\nIdentified {} improvement areas:", record.gaps.len()));
        parts.extend(record.gaps.iter().take(LISTED_GAPS).map(|gap| format!("  • {gap}")));
    }

    if !record.applied_improvements.is_empty() {
        parts.push(format!(
            "\nApplied {} high-priority improvements",
            record.applied_improvements.len()
        ));
    }

    if let Some(summary) = &record.final_summary {
        parts.push(format!("\n{summary}"));
    }

    if !record.errors.is_empty() {
        parts.push(format!("\nProcessing Issues: {}", record.errors.len()));
    }

    if parts.is_empty() {
        "CV analysis completed successfully.".to_string()
    } else {
        parts.join("\n")
    }
}
