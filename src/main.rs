use anyhow::Result;
use profile_translator::{apply, config::Config, memory::TranslationMemory};
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("profile_translator=info".parse()?),
        )
        .init();

    info!("Starting corpus translation job");

    let config = Config::from_env()?;
    config.require_api_key()?;

    // The memory is read once, flattened once, and stays immutable for the
    // whole run; the applier receives the lookup explicitly.
    let memory = TranslationMemory::load_or_empty(Path::new(&config.memory_file));
    let lookup = memory.flatten();
    info!(
        "Loaded {} reusable translations from {}",
        lookup.len(),
        config.memory_file
    );

    let client = reqwest::Client::new();
    let stats = apply::translate_corpus(&client, &config, &lookup).await?;

    info!(
        "Done: {} files written to {} ({} values from memory, {} machine translated, {} kept after failure)",
        stats.files_written,
        config.output_dir,
        stats.memory_hits,
        stats.machine_translated,
        stats.failures
    );
    Ok(())
}
