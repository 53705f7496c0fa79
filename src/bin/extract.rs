//! Extraction binary - aggregates unique profile values into the translation memory
//!
//! Usage:
//!   cargo run --bin extract                          # Rebuild the full memory file
//!   cargo run --bin extract -- --untranslated-only   # Write only the review subset
//!
//! Optional environment variables:
//! - CORPUS_DIR (defaults to data/source)
//! - MEMORY_FILE (defaults to translations/memory.json)
//! - REVIEW_FILE (defaults to translations/review.json)
//! - CLOSED_FIELDS (defaults to weight,shoes)

use anyhow::Result;
use profile_translator::{aggregate, config::Config, corpus, memory, review};
use profile_translator::memory::TranslationMemory;
use std::path::Path;
use tracing::{error, info};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("profile_translator=info".parse()?),
        )
        .init();

    let untranslated_only = std::env::args().any(|arg| arg == "--untranslated-only" || arg == "-u");

    let config = Config::from_env()?;

    if untranslated_only {
        info!(
            "Extracting untranslated values (closed fields: {})",
            config.closed_fields.join(", ")
        );
    } else {
        info!("Extracting unique profile values");
    }

    let records = corpus::read_corpus(Path::new(&config.corpus_dir))?;
    if records.is_empty() {
        error!("No JSON files found in {}", config.corpus_dir);
        return Ok(());
    }
    info!("Processing {} JSON files", records.len());

    // Always overlay onto prior state so reviewed translations survive
    // re-extraction.
    let prior = TranslationMemory::load_or_empty(Path::new(&config.memory_file));
    let fresh = aggregate::aggregate(&records);
    let current = TranslationMemory::overlay(fresh, &prior);

    if untranslated_only {
        let subset = review::extract_review_subset(&current, &config.closed_fields);
        subset.persist(
            Path::new(&config.review_file),
            review::review_file_info(&config.closed_fields),
        )?;

        info!("Review subset saved to {}", config.review_file);
        let outstanding = review::report_outstanding(&subset);
        if outstanding > 0 {
            info!(
                "Edit {} and run the merge job to fold translations back in",
                config.review_file
            );
        }
    } else {
        current.persist(Path::new(&config.memory_file), memory::memory_file_info())?;
        info!("Translation memory saved to {}", config.memory_file);

        for (field, stats) in current.field_stats() {
            info!(
                "{}: {} unique values, {} translated, {} outstanding",
                field,
                stats.total,
                stats.translated,
                stats.outstanding()
            );
        }

        let totals = current.stats();
        info!(
            "Total: {} unique values, {} translated",
            totals.total, totals.translated
        );
        if totals.outstanding() > 0 {
            info!(
                "{} values still need a translation; run with --untranslated-only to extract them",
                totals.outstanding()
            );
        } else {
            info!("Every value already has a translation");
        }
    }

    Ok(())
}
