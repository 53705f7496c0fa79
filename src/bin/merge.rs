//! Merge binary - folds an edited review subset back into the main memory
//!
//! Usage:
//!   cargo run --bin merge
//!
//! Optional environment variables:
//! - MEMORY_FILE (defaults to translations/memory.json)
//! - REVIEW_FILE (defaults to translations/review.json)

use anyhow::Result;
use profile_translator::{config::Config, memory, merge};
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

    let config = Config::from_env()?;
    let memory_path = Path::new(&config.memory_file);
    let review_path = Path::new(&config.review_file);

    // Missing inputs end the run cleanly; there is nothing to merge.
    if !memory_path.exists() {
        error!(
            "Translation memory file {} not found; run the extract job first",
            config.memory_file
        );
        return Ok(());
    }
    if !review_path.exists() {
        error!(
            "Review subset file {} not found; run extract --untranslated-only first",
            config.review_file
        );
        return Ok(());
    }

    let mut main_memory = TranslationMemory::load(memory_path)?;
    let subset = TranslationMemory::load(review_path)?;

    let updated = merge::merge_subset(&mut main_memory, &subset);
    main_memory.persist(memory_path, memory::memory_file_info())?;

    info!("Merged {} translations into {}", updated, config.memory_file);

    let stats = main_memory.stats();
    info!(
        "After merge: {} of {} values translated, {} outstanding",
        stats.translated,
        stats.total,
        stats.outstanding()
    );

    Ok(())
}
