//! Corpus access: reading, classifying, and writing profile record documents.
//!
//! A corpus is a directory of JSON documents, each optionally carrying a
//! `profile` object whose entries are strings, lists, or anything else.
//! Documents that fail to read or parse are skipped with an error for that
//! file only; they never abort a batch.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// A single corpus document plus the file name it was read from.
///
/// The document is kept as raw JSON so that rewriting a record preserves
/// every field we do not touch (key order included, via `preserve_order`).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub file_name: String,
    pub document: Value,
}

impl Record {
    /// The record's `profile` object, if it has one.
    ///
    /// Absent or non-object `profile` is a first-class outcome: callers skip
    /// the record silently rather than probing the document shape themselves.
    pub fn profile(&self) -> Option<&Map<String, Value>> {
        self.document.get("profile").and_then(Value::as_object)
    }

    pub fn profile_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.document
            .get_mut("profile")
            .and_then(Value::as_object_mut)
    }
}

/// Classification of a profile entry value.
///
/// The aggregator and the bulk applier match on this exhaustively instead of
/// inspecting raw JSON at every call site.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    /// A direct string value.
    Text(&'a str),
    /// A list value; string items are extracted individually.
    Items(&'a Vec<Value>),
    /// Anything else (numbers, objects, null) — never translated.
    Other,
}

pub fn classify(value: &Value) -> FieldValue<'_> {
    match value {
        Value::String(text) => FieldValue::Text(text),
        Value::Array(items) => FieldValue::Items(items),
        _ => FieldValue::Other,
    }
}

/// List the `*.json` files in a directory, sorted by path for deterministic
/// processing order. A missing directory yields an empty list, not an error;
/// the caller decides how to report an empty corpus.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read corpus directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse a single record file.
pub fn read_record(path: &Path) -> Result<Record> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("File has no valid UTF-8 name")?
        .to_string();

    Ok(Record {
        file_name,
        document,
    })
}

/// Read every JSON document in a directory. Unreadable or malformed files are
/// reported and skipped.
pub fn read_corpus(dir: &Path) -> Result<Vec<Record>> {
    let files = list_json_files(dir)?;

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        match read_record(path) {
            Ok(record) => records.push(record),
            Err(e) => error!("Skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(records)
}

/// Write a record into the destination directory under its original file
/// name. The destination is created if needed; a write failure here is a
/// real error, not a per-record skip.
pub fn write_record(dir: &Path, record: &Record) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(&record.file_name);
    let mut json = serde_json::to_string_pretty(&record.document)
        .with_context(|| format!("Failed to serialize {}", record.file_name))?;
    json.push('\n');

    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
