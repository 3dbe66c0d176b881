//! AI text generation (Gemini Generative Language API).
//!
//! Used for scenario suggestions in the session wizard and for summaries of
//! finished sessions. Both operations always produce text: any failure,
//! including a missing API key, yields a fixed fallback sentence.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::config::{GenerationConfig, validate_url};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const SCENARIO_FALLBACK: &str =
    "A high-pressure negotiation is required due to shifting priorities and limited resources.";
pub const SUMMARY_FALLBACK: &str = "Summary generation unavailable.";

/// Resolved endpoint settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl GeminiConfig {
    /// Resolves settings from config and environment.
    ///
    /// API key: config `api_key`, then `GEMINI_API_KEY`.
    /// Base URL: `GEMINI_BASE_URL`, then config `base_url`, then the public endpoint.
    ///
    /// # Errors
    /// Returns an error if no API key is available or the base URL is invalid.
    pub fn resolve(config: &GenerationConfig) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let base_url = resolve_base_url(config.base_url.as_deref())?;
        Ok(Self {
            api_key,
            base_url,
            model: config.model.clone(),
        })
    }
}

fn resolve_api_key(config_api_key: Option<&str>) -> Result<String> {
    if let Some(key) = config_api_key {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    std::env::var("GEMINI_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .context("No API key available. Set GEMINI_API_KEY or api_key in [generation].")
}

fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    let env = std::env::var("GEMINI_BASE_URL").ok();
    let chosen = [env.as_deref(), config_base_url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty());
    match chosen {
        Some(url) => {
            validate_url(url, "Gemini")?;
            Ok(url.trim_end_matches('/').to_string())
        }
        None => Ok(DEFAULT_BASE_URL.to_string()),
    }
}

/// Scenario and summary generator.
///
/// Holds the resolution result so a missing key is reported once, at
/// construction, and every later call falls back without a request.
/// Each request is bounded by `timeout` when one is set.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Option<GeminiConfig>,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

impl Generator {
    pub fn new(config: &GenerationConfig, timeout: Option<Duration>) -> Self {
        let config = match GeminiConfig::resolve(config) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::info!("AI generation disabled: {e:#}");
                None
            }
        };
        Self::with_config(config, timeout)
    }

    pub fn with_config(config: Option<GeminiConfig>, timeout: Option<Duration>) -> Self {
        Self {
            config,
            timeout,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.config.is_some()
    }

    /// Suggests a scenario for a persona role. Never fails.
    pub async fn generate_scenario(&self, role: &str, difficulty: &str) -> String {
        match self.generate_text(&scenario_prompt(role, difficulty)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("scenario generation failed: {e:#}");
                SCENARIO_FALLBACK.to_string()
            }
        }
    }

    /// Summarizes a `role: content` transcript. Never fails.
    pub async fn generate_summary(&self, transcript: &str) -> String {
        match self.generate_text(&summary_prompt(transcript)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("summary generation failed: {e:#}");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let config = self
            .config
            .as_ref()
            .context("AI generation is not configured")?;
        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url, config.model
        );

        let mut request = self
            .http
            .post(url)
            .headers(build_headers(&config.api_key))
            .json(&build_request(prompt));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.context("Gemini request failed")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Gemini error {}: {body}", status.as_u16());
        }

        let value: Value = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Gemini response JSON: {body}"))?;
        extract_text(&value)
    }
}

pub fn scenario_prompt(role: &str, difficulty: &str) -> String {
    format!(
        "Generate a realistic negotiation scenario involving a {role}.\n\
         Difficulty: {difficulty}.\n\
         Keep it under 3 sentences. Focus on feature scope, deadlines, or resources."
    )
}

pub fn summary_prompt(transcript: &str) -> String {
    format!(
        "Summarize the following negotiation transcript in 3-4 sentences. \
         Focus on the outcome and key arguments.\n\nTranscript:\n{transcript}"
    )
}

fn build_request(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    })
}

/// Joins the text parts of the first candidate, trimmed.
fn extract_text(value: &Value) -> Result<String> {
    let parts = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .context("Gemini response has no candidates")?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Gemini response contained no text");
    }
    Ok(text.to_string())
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn generator_for(base_url: String) -> Generator {
        Generator::with_config(
            Some(GeminiConfig {
                api_key: "test-key".to_string(),
                base_url,
                model: "gemini-2.0-flash".to_string(),
            }),
            Some(Duration::from_secs(5)),
        )
    }

    #[test]
    fn scenario_prompt_names_role_and_difficulty() {
        let prompt = scenario_prompt("Chief Technology Officer", "Hard");
        assert!(prompt.contains("involving a Chief Technology Officer."));
        assert!(prompt.contains("Difficulty: Hard."));
        assert!(prompt.contains("under 3 sentences"));
    }

    #[test]
    fn summary_prompt_appends_transcript() {
        let prompt = summary_prompt("user: hi\nassistant: no");
        assert!(prompt.starts_with("Summarize the following negotiation transcript"));
        assert!(prompt.ends_with("Transcript:\nuser: hi\nassistant: no"));
    }

    #[test]
    fn configured_api_key_wins_over_environment() {
        assert_eq!(resolve_api_key(Some("  cfg-key ")).unwrap(), "cfg-key");
    }

    #[test]
    fn extract_text_joins_and_trims_parts() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  The CTO " }, { "text": "refuses.\n" }] }
            }]
        });
        assert_eq!(extract_text(&value).unwrap(), "The CTO refuses.");
    }

    #[test]
    fn extract_text_rejects_empty_response() {
        assert!(extract_text(&json!({ "candidates": [] })).is_err());
        let blank = json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] });
        assert!(extract_text(&blank).is_err());
    }

    #[tokio::test]
    async fn unconfigured_generator_returns_fallbacks() {
        let generator = Generator::with_config(None, None);
        assert!(!generator.is_available());
        assert_eq!(
            generator.generate_scenario("CFO", "Hard").await,
            SCENARIO_FALLBACK
        );
        assert_eq!(generator.generate_summary("user: hi").await, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn generates_scenario_from_api() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "\nThe CFO wants a 20% cut.\n" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = generator_for(server.uri());
        assert_eq!(
            generator.generate_scenario("CFO", "Hard").await,
            "The CFO wants a 20% cut."
        );
    }

    #[tokio::test]
    async fn api_error_falls_back() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let generator = generator_for(server.uri());
        assert_eq!(generator.generate_summary("user: hi").await, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn slow_api_times_out_to_fallback() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(json!({
                        "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
                    })),
            )
            .mount(&server)
            .await;

        let generator = Generator::with_config(
            Some(GeminiConfig {
                api_key: "test-key".to_string(),
                base_url: server.uri(),
                model: "gemini-2.0-flash".to_string(),
            }),
            Some(Duration::from_millis(200)),
        );
        let scenario = tokio::time::timeout(
            Duration::from_secs(3),
            generator.generate_scenario("CFO", "Hard"),
        )
        .await
        .expect("generation should be bounded by the request timeout");
        assert_eq!(scenario, SCENARIO_FALLBACK);
    }
}
