//! The persisted translation memory: `field -> value -> {count, translation}`.
//!
//! The memory is the system's source of truth for reusable translations. It
//! is created by an aggregation run, overlaid onto prior state so reviewed
//! translations survive re-extraction, edited externally through the review
//! subset, and advanced by the merge engine. Persistence is deterministic so
//! that re-running over unchanged input reproduces the file byte-for-byte.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::warn;

/// A single memory entry: how often the value occurs in the corpus, and its
/// reviewed translation (empty until a human or a merge supplies one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub count: u64,
    #[serde(default)]
    pub translation: String,
}

impl MemoryEntry {
    pub fn untranslated(count: u64) -> Self {
        Self {
            count,
            translation: String::new(),
        }
    }

    /// Whether the entry still needs a human translation.
    pub fn is_untranslated(&self) -> bool {
        self.translation.trim().is_empty()
    }
}

/// Per-field translated/total counts, for run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    pub total: usize,
    pub translated: usize,
}

impl MemoryStats {
    pub fn outstanding(&self) -> usize {
        self.total - self.translated
    }
}

/// Field name -> ordered `(value, entry)` pairs.
///
/// Fields iterate in ascending name order; entries within a field are kept
/// in descending count order with ascending value as the tie-break. Both
/// orderings are invariants of construction, so persisting the same memory
/// twice produces identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMemory {
    fields: BTreeMap<String, Vec<(String, MemoryEntry)>>,
}

impl TranslationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a memory from raw occurrence counts, applying the canonical
    /// entry ordering. All translations start empty.
    pub fn from_counts(counts: BTreeMap<String, HashMap<String, u64>>) -> Self {
        let mut fields = BTreeMap::new();
        for (field, value_counts) in counts {
            let mut entries: Vec<(String, MemoryEntry)> = value_counts
                .into_iter()
                .map(|(value, count)| (value, MemoryEntry::untranslated(count)))
                .collect();
            entries.sort_by(|(value_a, entry_a), (value_b, entry_b)| {
                entry_b
                    .count
                    .cmp(&entry_a.count)
                    .then_with(|| value_a.cmp(value_b))
            });
            fields.insert(field, entries);
        }
        Self { fields }
    }

    /// Insert a whole field's entries, preserving the given order. Used when
    /// deriving one memory-shaped document from another (e.g. the review
    /// subset), where the source ordering is already canonical.
    pub fn insert_field(&mut self, field: String, entries: Vec<(String, MemoryEntry)>) {
        self.fields.insert(field, entries);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in ascending name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Vec<(String, MemoryEntry)>)> {
        self.fields.iter()
    }

    pub fn get(&self, field: &str, value: &str) -> Option<&MemoryEntry> {
        self.fields
            .get(field)?
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, entry)| entry)
    }

    pub fn get_mut(&mut self, field: &str, value: &str) -> Option<&mut MemoryEntry> {
        self.fields
            .get_mut(field)?
            .iter_mut()
            .find(|(v, _)| v == value)
            .map(|(_, entry)| entry)
    }

    /// Combine freshly aggregated counts with previously stored translations.
    ///
    /// Every `(field, value)` of `fresh` keeps its fresh count; a non-blank
    /// translation in `prior` for the same key is carried over. Keys present
    /// only in `prior` are dropped: the memory mirrors the current corpus,
    /// not historical residue.
    pub fn overlay(mut fresh: TranslationMemory, prior: &TranslationMemory) -> TranslationMemory {
        for (field, entries) in fresh.fields.iter_mut() {
            for (value, entry) in entries.iter_mut() {
                if let Some(previous) = prior.get(field, value) {
                    if !previous.is_untranslated() {
                        entry.translation = previous.translation.clone();
                    }
                }
            }
        }
        fresh
    }

    /// Load a persisted memory, treating a missing or malformed file as
    /// empty prior state. Never fatal: losing the warning is worse than
    /// aborting an extraction run.
    pub fn load_or_empty(path: &Path) -> TranslationMemory {
        match Self::load(path) {
            Ok(memory) => memory,
            Err(e) => {
                warn!(
                    "No usable prior state at {} ({:#}); starting empty",
                    path.display(),
                    e
                );
                TranslationMemory::new()
            }
        }
    }

    /// Strict load, for callers (the merge job) that require the file.
    pub fn load(path: &Path) -> Result<TranslationMemory> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Self::from_document(&document)
            .with_context(|| format!("Unexpected memory file shape in {}", path.display()))
    }

    fn from_document(document: &Value) -> Result<TranslationMemory> {
        let translations = document
            .get("translations")
            .and_then(Value::as_object)
            .context("Missing 'translations' object")?;

        let mut fields = BTreeMap::new();
        for (field, values) in translations {
            let values = values
                .as_object()
                .with_context(|| format!("Field '{}' is not an object", field))?;

            let mut entries = Vec::with_capacity(values.len());
            for (value, entry) in values {
                let entry: MemoryEntry = serde_json::from_value(entry.clone())
                    .with_context(|| format!("Bad entry for '{}' in '{}'", value, field))?;
                entries.push((value.clone(), entry));
            }
            fields.insert(field.clone(), entries);
        }
        Ok(TranslationMemory { fields })
    }

    /// Render the memory as a JSON document with the given `_info` header.
    pub fn to_document(&self, info: Value) -> Value {
        let mut translations = Map::new();
        for (field, entries) in &self.fields {
            let mut values = Map::new();
            for (value, entry) in entries {
                values.insert(
                    value.clone(),
                    json!({
                        "count": entry.count,
                        "translation": entry.translation,
                    }),
                );
            }
            translations.insert(field.clone(), Value::Object(values));
        }

        let mut document = Map::new();
        document.insert("_info".to_string(), info);
        document.insert("translations".to_string(), Value::Object(translations));
        Value::Object(document)
    }

    /// Write the memory deterministically: fixed header key order, fields
    /// ascending, entries in canonical order, pretty-printed, trailing
    /// newline. Unable-to-write is the one genuinely fatal outcome here.
    pub fn persist(&self, path: &Path, info: Value) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }

        let mut json = serde_json::to_string_pretty(&self.to_document(info))
            .context("Failed to serialize translation memory")?;
        json.push('\n');

        fs::write(path, json)
            .with_context(|| format!("Failed to write translation memory to {}", path.display()))
    }

    /// Flatten to `value -> translation` across all fields, keeping only
    /// non-blank translations. Lookup is intentionally not scoped by field:
    /// identical literal values share one translation wherever they appear.
    /// Fields are visited in ascending order, so a literal collision resolves
    /// to the lexically last field, deterministically.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut lookup = BTreeMap::new();
        for entries in self.fields.values() {
            for (value, entry) in entries {
                if !entry.is_untranslated() {
                    lookup.insert(value.clone(), entry.translation.clone());
                }
            }
        }
        lookup
    }

    pub fn stats(&self) -> MemoryStats {
        let mut stats = MemoryStats::default();
        for entries in self.fields.values() {
            stats.total += entries.len();
            stats.translated += entries.iter().filter(|(_, e)| !e.is_untranslated()).count();
        }
        stats
    }

    /// Per-field stats, in field order.
    pub fn field_stats(&self) -> Vec<(&str, MemoryStats)> {
        self.fields
            .iter()
            .map(|(field, entries)| {
                let translated = entries.iter().filter(|(_, e)| !e.is_untranslated()).count();
                (
                    field.as_str(),
                    MemoryStats {
                        total: entries.len(),
                        translated,
                    },
                )
            })
            .collect()
    }
}

/// The `_info` header written into the main memory file.
pub fn memory_file_info() -> Value {
    json!({
        "description": "Reviewed translations for every profile field in the corpus",
        "instructions": "Fill each empty 'translation' with the target-language text",
        "note": "'count' is how many times the value occurs in the corpus",
    })
}
