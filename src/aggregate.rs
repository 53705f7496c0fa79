//! Value aggregation: collect every unique profile string value per field,
//! with occurrence counts, across the whole corpus.

use crate::corpus::{classify, FieldValue, Record};
use crate::memory::TranslationMemory;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Aggregate unique `(field, value)` occurrences into a fresh memory.
///
/// Direct string values contribute themselves; list values contribute each
/// string item. Values that are empty after trimming are skipped (the value
/// itself is recorded verbatim — trimming is only the emptiness test).
/// Records without a profile object are a normal, silent skip.
///
/// Pure: persistence and prior-state overlay are separate, explicit steps.
pub fn aggregate<'a, I>(records: I) -> TranslationMemory
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: BTreeMap<String, HashMap<String, u64>> = BTreeMap::new();

    for record in records {
        let Some(profile) = record.profile() else {
            debug!("{}: no profile object, skipping", record.file_name);
            continue;
        };

        for (field, value) in profile {
            match classify(value) {
                FieldValue::Text(text) => tally(&mut counts, field, text),
                FieldValue::Items(items) => {
                    for item in items {
                        if let FieldValue::Text(text) = classify(item) {
                            tally(&mut counts, field, text);
                        }
                    }
                }
                FieldValue::Other => {}
            }
        }
    }

    TranslationMemory::from_counts(counts)
}

fn tally(counts: &mut BTreeMap<String, HashMap<String, u64>>, field: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    *counts
        .entry(field.to_string())
        .or_default()
        .entry(text.to_string())
        .or_insert(0) += 1;
}
