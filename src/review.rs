//! Review-subset extraction: the untranslated slice of the memory that goes
//! out for human editing.
//!
//! The subset is persisted separately from the main memory so edits cannot
//! corrupt entries that are already translated.

use crate::memory::TranslationMemory;
use serde_json::{json, Value};
use tracing::info;

/// Derive the review subset: skip closed fields, keep only entries whose
/// translation is still blank, and omit fields left with nothing to review.
pub fn extract_review_subset(
    memory: &TranslationMemory,
    closed_fields: &[String],
) -> TranslationMemory {
    let mut subset = TranslationMemory::new();

    for (field, entries) in memory.fields() {
        if closed_fields.iter().any(|closed| closed == field) {
            continue;
        }

        let outstanding: Vec<_> = entries
            .iter()
            .filter(|(_, entry)| entry.is_untranslated())
            .cloned()
            .collect();

        if !outstanding.is_empty() {
            subset.insert_field(field.clone(), outstanding);
        }
    }

    subset
}

/// The `_info` header for the review subset file, naming the exclusions.
pub fn review_file_info(closed_fields: &[String]) -> Value {
    json!({
        "description": "Profile values that still need a translation",
        "instructions": "Fill each empty 'translation' with the target-language text, then run the merge job",
        "note": "'count' is how many times the value occurs in the corpus",
        "skipped_fields": closed_fields.join(", "),
    })
}

/// Log per-field outstanding counts and the grand total; returns the total.
pub fn report_outstanding(subset: &TranslationMemory) -> usize {
    let mut total = 0;
    for (field, stats) in subset.field_stats() {
        info!("{}: {} values awaiting translation", field, stats.total);
        total += stats.total;
    }

    if total == 0 {
        info!("Nothing left to translate");
    } else {
        info!("{} values awaiting translation in total", total);
    }
    total
}
