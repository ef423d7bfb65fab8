//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API for single-prompt text
//! generation. Auth is via an API key passed as a query parameter
//! (`key={api_key}`), read from the environment variable named in config.

use std::time::Duration;

use serde_json::Value;

use lq_domain::config::GeneratorConfig;
use lq_domain::error::{Error, Result};

use crate::traits::ResponseGenerator;
use crate::util::{from_reqwest, redact_url_key};

const BACKEND: &str = "gemini";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A response generator backed by the Google Gemini API.
pub struct GeminiGenerator {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a generator from config. Fails when the API key variable is
    /// unset or empty.
    pub fn from_config(cfg: &GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "environment variable '{}' not set or empty",
                    cfg.api_key_env
                ))
            })?;
        Self::new(&cfg.base_url, &cfg.model, api_key)
    }

    pub fn new(base_url: &str, model: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, model, api_key, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| from_reqwest(BACKEND, e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

fn build_body(prompt: &str) -> Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": prompt}],
        }],
    })
}

fn failure(message: impl Into<String>) -> Error {
    Error::Generation {
        backend: BACKEND.into(),
        message: message.into(),
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_gemini_response(body: &Value) -> Result<String> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| failure("no candidates in response"))?;

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(failure("empty completion"));
    }
    Ok(text.to_string())
}

#[async_trait::async_trait]
impl ResponseGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.generate_url();
        tracing::debug!(url = %redact_url_key(&url), "gemini generate request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&build_body(prompt))
            .send()
            .await
            .map_err(|e| from_reqwest(BACKEND, e))?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(|e| from_reqwest(BACKEND, e))?;

        if !status.is_success() {
            return Err(failure(format!("HTTP {} - {}", status.as_u16(), resp_text)));
        }

        let resp_json: Value = serde_json::from_str(&resp_text)
            .map_err(|e| failure(format!("invalid JSON: {e}")))?;
        parse_gemini_response(&resp_json)
    }

    fn backend_id(&self) -> &str {
        BACKEND
    }
}
