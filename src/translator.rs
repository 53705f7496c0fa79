//! The external machine-translation collaborator.
//!
//! One value in, one translation out, source and target language fixed for
//! the run. The bulk applier consults the translation memory first and only
//! lands here on a miss; a failure bubbles up so the caller can keep the
//! original value and move on.

use crate::config::Config;
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct TranslationRequest {
    model: String,
    messages: Vec<Message>,
    max_completion_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Human-readable language name for the prompt, falling back to the raw code.
fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "id" => "Indonesian",
        "es" => "Spanish",
        "ja" => "Japanese",
        other => other,
    }
}

fn build_system_prompt(source: &str, target: &str) -> String {
    format!(
        r#"You are a professional translator. Translate short profile attribute values from {} to {}.

Rules:
- Reply with the translation only, no quotes and no explanations.
- Preserve the tone and nuance of the original phrasing.
- Keep proper names unchanged.
- If a value has no good translation, return it unchanged."#,
        language_name(source),
        language_name(target)
    )
}

/// Shortened form of the value for log labels.
fn preview(text: &str) -> String {
    const LIMIT: usize = 40;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}

/// Translate a single value via the OpenAI chat completions API.
///
/// Retries rate limits, 5xx responses, and network errors; other client
/// errors fail fast. An empty result from the provider is an error so that
/// the caller falls back to the original value.
pub async fn translate_text(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
) -> Result<String> {
    let api_key = config.require_api_key()?;

    let request = TranslationRequest {
        model: config.openai_model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: build_system_prompt(&config.source_lang, &config.target_lang),
            },
            Message {
                role: "user".to_string(),
                content: text.to_string(),
            },
        ],
        max_completion_tokens: 512,
        temperature: 0.3,
    };

    let translated = with_retry_if(
        &RetryConfig::api_call(),
        &format!("Translate '{}'", preview(text)),
        || async {
            let response = client
                .post(&config.openai_api_url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
                .context("Failed to send translation request")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                anyhow::bail!("Translation API error ({}): {}", status, body);
            }

            let chat_response: ChatResponse = response
                .json()
                .await
                .context("Failed to parse translation response")?;

            let content = chat_response
                .choices
                .first()
                .map(|c| c.message.content.clone())
                .context("Translation response contained no choices")?;

            Ok(content)
        },
        is_retryable_error,
    )
    .await?;

    let translated = translated.trim().to_string();
    if translated.is_empty() {
        anyhow::bail!("Translator returned an empty result for '{}'", preview(text));
    }
    Ok(translated)
}

/// Retry 429 and 5xx API errors plus anything that looks like a transient
/// network problem; other 4xx client errors are not retried.
fn is_retryable_error(error: &anyhow::Error) -> bool {
    let error_str = error.to_string();

    // Error format: "Translation API error (400 Bad Request): ..."
    if error_str.contains("Translation API error") {
        if let Some(start) = error_str.find('(') {
            if let Some(end) = error_str[start..].find(')') {
                let status_str = &error_str[start + 1..start + end];
                let status_num = status_str.split_whitespace().next().unwrap_or("");
                if let Ok(status) = status_num.parse::<u16>() {
                    return status == 429 || status >= 500;
                }
            }
        }
    }

    true
}
