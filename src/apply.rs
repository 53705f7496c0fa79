//! Bulk application: rewrite the corpus using the translation memory first
//! and the machine translator on a miss.
//!
//! The flattened lookup is built once before the pass and stays read-only
//! throughout it; translator results are never fed back into the memory.

use crate::config::Config;
use crate::corpus::{self, classify, FieldValue, Record};
use crate::translator;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome counters for one apply run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub files_written: usize,
    /// Values rewritten from the memory lookup.
    pub memory_hits: usize,
    /// Values rewritten by the fallback translator.
    pub machine_translated: usize,
    /// Values kept as-is after a translator failure.
    pub failures: usize,
}

/// Rewrite one record's direct string profile fields in place.
///
/// List values and non-string values are left untouched in this pass. A
/// translator failure keeps the original value and is reported with the
/// offending field; it never aborts the batch.
pub async fn translate_record(
    client: &reqwest::Client,
    config: &Config,
    lookup: &BTreeMap<String, String>,
    record: &mut Record,
    stats: &mut ApplyStats,
) {
    let file_name = record.file_name.clone();
    let Some(profile) = record.profile_mut() else {
        debug!("{}: no profile object, nothing to translate", file_name);
        return;
    };

    for (field, value) in profile.iter_mut() {
        let original = match classify(value) {
            FieldValue::Text(text) if !text.trim().is_empty() => text.to_string(),
            _ => continue,
        };

        let replacement = if let Some(translation) = lookup.get(&original) {
            stats.memory_hits += 1;
            translation.clone()
        } else {
            match translator::translate_text(client, config, &original).await {
                Ok(translated) => {
                    stats.machine_translated += 1;
                    translated
                }
                Err(e) => {
                    stats.failures += 1;
                    warn!(
                        "{}: keeping original for field '{}' value '{}': {:#}",
                        file_name, field, original, e
                    );
                    continue;
                }
            }
        };

        if replacement != original {
            debug!("{}: {}: '{}' -> '{}'", file_name, field, original, replacement);
        }
        *value = Value::String(replacement);
    }
}

/// Translate the whole corpus into the output directory.
///
/// Every record is rewritten independently and written under its original
/// file name; the source corpus is never modified. An interrupted run leaves
/// already-written outputs behind, and re-running simply overwrites them.
pub async fn translate_corpus(
    client: &reqwest::Client,
    config: &Config,
    lookup: &BTreeMap<String, String>,
) -> Result<ApplyStats> {
    let corpus_dir = Path::new(&config.corpus_dir);
    let records = corpus::read_corpus(corpus_dir)?;

    let mut stats = ApplyStats::default();
    if records.is_empty() {
        info!("No JSON files found in {}", config.corpus_dir);
        return Ok(stats);
    }

    info!("Processing {} JSON files", records.len());
    let output_dir = Path::new(&config.output_dir);

    for mut record in records {
        debug!("Processing {}", record.file_name);
        translate_record(client, config, lookup, &mut record, &mut stats).await;

        let path = corpus::write_record(output_dir, &record)?;
        debug!("Saved {}", path.display());
        stats.files_written += 1;
    }

    Ok(stats)
}
