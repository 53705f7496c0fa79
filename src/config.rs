use anyhow::{Context, Result};

/// Runtime configuration, loaded from the environment (and `.env` via dotenvy).
///
/// The extraction and merge binaries only touch the corpus/memory settings;
/// the OpenAI key is only required by the bulk-apply job, so it stays optional
/// here and is checked at the call site.
#[derive(Debug, Clone)]
pub struct Config {
    // Corpus locations
    pub corpus_dir: String,
    pub output_dir: String,

    // Translation memory files
    pub memory_file: String,
    pub review_file: String,

    // Fields considered fully translated, excluded from review extraction
    pub closed_fields: Vec<String>,

    // Languages (fixed for a run)
    pub source_lang: String,
    pub target_lang: String,

    // OpenAI (machine-translation fallback)
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Corpus
            corpus_dir: std::env::var("CORPUS_DIR").unwrap_or_else(|_| "data/source".to_string()),
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "data/translated".to_string()),

            // Memory files
            memory_file: std::env::var("MEMORY_FILE")
                .unwrap_or_else(|_| "translations/memory.json".to_string()),
            review_file: std::env::var("REVIEW_FILE")
                .unwrap_or_else(|_| "translations/review.json".to_string()),

            // Closed fields
            closed_fields: parse_closed_fields(
                &std::env::var("CLOSED_FIELDS").unwrap_or_else(|_| "weight,shoes".to_string()),
            ),

            // Languages
            source_lang: std::env::var("SOURCE_LANG").unwrap_or_else(|_| "en".to_string()),
            target_lang: std::env::var("TARGET_LANG").unwrap_or_else(|_| "id".to_string()),

            // OpenAI
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
        })
    }

    /// The API key, required for the bulk-apply job.
    pub fn require_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY not set")
    }
}

/// Parse a comma-separated closed-field list, ignoring blanks.
fn parse_closed_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "CORPUS_DIR",
            "OUTPUT_DIR",
            "MEMORY_FILE",
            "REVIEW_FILE",
            "CLOSED_FIELDS",
            "SOURCE_LANG",
            "TARGET_LANG",
            "OPENAI_API_KEY",
            "OPENAI_MODEL",
            "OPENAI_API_URL",
        ] {
            std::env::remove_var(var);
        }
    }

    // ==================== Defaults ====================

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();

        let config = Config::from_env().expect("Should load with defaults");

        assert_eq!(config.corpus_dir, "data/source");
        assert_eq!(config.output_dir, "data/translated");
        assert_eq!(config.memory_file, "translations/memory.json");
        assert_eq!(config.review_file, "translations/review.json");
        assert_eq!(config.closed_fields, vec!["weight", "shoes"]);
        assert_eq!(config.source_lang, "en");
        assert_eq!(config.target_lang, "id");
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert!(config.openai_api_url.contains("chat/completions"));
    }

    #[test]
    #[serial]
    fn test_config_overrides() {
        clear_env();
        std::env::set_var("CORPUS_DIR", "fixtures/in");
        std::env::set_var("OUTPUT_DIR", "fixtures/out");
        std::env::set_var("CLOSED_FIELDS", "dorm, class");
        std::env::set_var("TARGET_LANG", "es");
        std::env::set_var("OPENAI_API_KEY", "sk-test");

        let config = Config::from_env().expect("Should load");

        assert_eq!(config.corpus_dir, "fixtures/in");
        assert_eq!(config.output_dir, "fixtures/out");
        assert_eq!(config.closed_fields, vec!["dorm", "class"]);
        assert_eq!(config.target_lang, "es");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_require_api_key_missing() {
        clear_env();

        let config = Config::from_env().expect("Should load");
        let err = config.require_api_key().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    // ==================== Closed-field parsing ====================

    #[test]
    fn test_parse_closed_fields_trims_and_skips_blanks() {
        assert_eq!(
            parse_closed_fields(" weight , shoes ,, "),
            vec!["weight", "shoes"]
        );
    }

    #[test]
    fn test_parse_closed_fields_empty_string() {
        assert!(parse_closed_fields("").is_empty());
    }

    #[test]
    fn test_parse_closed_fields_single() {
        assert_eq!(parse_closed_fields("secrets"), vec!["secrets"]);
    }
}
