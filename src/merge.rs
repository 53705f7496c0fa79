//! Merge engine: fold an edited review subset back into the main memory.

use crate::memory::TranslationMemory;

/// Apply the subset's non-blank translations to the matching entries of the
/// main memory. Returns the number of entries whose translation actually
/// changed.
///
/// Subset keys absent from the memory are ignored without comment: the
/// corpus may have drifted between extraction and review, and that is not a
/// defect. Blank subset translations never regress a memory entry, and
/// re-merging the same subset is a no-op, so the operation is idempotent.
pub fn merge_subset(memory: &mut TranslationMemory, subset: &TranslationMemory) -> usize {
    let mut updated = 0;

    for (field, entries) in subset.fields() {
        for (value, entry) in entries {
            if entry.translation.trim().is_empty() {
                continue;
            }
            if let Some(existing) = memory.get_mut(field, value) {
                if existing.translation != entry.translation {
                    existing.translation = entry.translation.clone();
                    updated += 1;
                }
            }
        }
    }

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEntry;

    fn memory_with(fields: &[(&str, &[(&str, u64, &str)])]) -> TranslationMemory {
        let mut memory = TranslationMemory::new();
        for (field, entries) in fields {
            memory.insert_field(
                field.to_string(),
                entries
                    .iter()
                    .map(|(value, count, translation)| {
                        (
                            value.to_string(),
                            MemoryEntry {
                                count: *count,
                                translation: translation.to_string(),
                            },
                        )
                    })
                    .collect(),
            );
        }
        memory
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_applies_new_translation() {
        let mut memory = memory_with(&[("weight", &[("heavy", 1, "")])]);
        let subset = memory_with(&[("weight", &[("heavy", 1, "berat")])]);

        let updated = merge_subset(&mut memory, &subset);

        assert_eq!(updated, 1);
        assert_eq!(memory.get("weight", "heavy").unwrap().translation, "berat");
    }

    #[test]
    fn test_merge_leaves_other_entries_untouched() {
        let mut memory = memory_with(&[(
            "weight",
            &[("heavy", 1, ""), ("light", 2, "ringan")],
        )]);
        let subset = memory_with(&[("weight", &[("heavy", 1, "berat")])]);

        merge_subset(&mut memory, &subset);

        assert_eq!(memory.get("weight", "light").unwrap().translation, "ringan");
        assert_eq!(memory.get("weight", "light").unwrap().count, 2);
    }

    #[test]
    fn test_merge_skips_blank_subset_translations() {
        let mut memory = memory_with(&[("weight", &[("heavy", 1, "berat")])]);
        let subset = memory_with(&[("weight", &[("heavy", 1, "   ")])]);

        let updated = merge_subset(&mut memory, &subset);

        assert_eq!(updated, 0);
        assert_eq!(
            memory.get("weight", "heavy").unwrap().translation,
            "berat",
            "A blank edit must never regress a translation"
        );
    }

    #[test]
    fn test_merge_ignores_keys_missing_from_memory() {
        let mut memory = memory_with(&[("weight", &[("heavy", 1, "")])]);
        let subset = memory_with(&[
            ("weight", &[("feather-light", 1, "seringan bulu")]),
            ("vanished", &[("gone", 1, "hilang")]),
        ]);

        let updated = merge_subset(&mut memory, &subset);

        assert_eq!(updated, 0);
        assert!(memory.get("weight", "feather-light").is_none());
        assert!(memory.get("vanished", "gone").is_none());
    }

    #[test]
    fn test_merge_overwrites_existing_translation() {
        let mut memory = memory_with(&[("weight", &[("heavy", 1, "old")])]);
        let subset = memory_with(&[("weight", &[("heavy", 1, "berat")])]);

        let updated = merge_subset(&mut memory, &subset);

        assert_eq!(updated, 1);
        assert_eq!(memory.get("weight", "heavy").unwrap().translation, "berat");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut once = memory_with(&[(
            "weight",
            &[("heavy", 1, ""), ("light", 2, "ringan")],
        )]);
        let subset = memory_with(&[("weight", &[("heavy", 1, "berat")])]);

        merge_subset(&mut once, &subset);
        let mut twice = once.clone();
        let updated_again = merge_subset(&mut twice, &subset);

        assert_eq!(updated_again, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty_subset_is_noop() {
        let mut memory = memory_with(&[("weight", &[("heavy", 1, "berat")])]);
        let before = memory.clone();

        let updated = merge_subset(&mut memory, &TranslationMemory::new());

        assert_eq!(updated, 0);
        assert_eq!(memory, before);
    }

    #[test]
    fn test_merge_counts_only_actual_changes() {
        let mut memory = memory_with(&[(
            "secrets",
            &[("fear", 2, "takut"), ("pride", 1, "")],
        )]);
        // fear already carries the same translation; only pride changes
        let subset = memory_with(&[(
            "secrets",
            &[("fear", 2, "takut"), ("pride", 1, "bangga")],
        )]);

        assert_eq!(merge_subset(&mut memory, &subset), 1);
    }
}
