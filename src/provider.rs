//! Suggestion provider implementations.
//!
//! - **[`StubProvider`]**: deterministic candidates, optional simulated latency.
//! - **[`OpenAiProvider`]**: calls an OpenAI-compatible chat-completions API
//!   with retry and backoff.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to instantiate the provider named by the
//! configuration. The config's tunables are applied through
//! [`SuggestionProvider::configure`] so both providers read them the same
//! way.
//!
//! # Retry Strategy
//!
//! The OpenAI provider uses exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use wordhoard_core::provider::{ProviderOptions, ProviderRequest, SuggestionProvider};

use crate::config::ProviderConfig;
use crate::prompt;

/// Build the provider named in `config.kind`, configured from `config`.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn SuggestionProvider>> {
    let mut provider: Box<dyn SuggestionProvider> = match config.kind.as_str() {
        "stub" => Box::new(StubProvider::new()),
        "openai" => Box::new(OpenAiProvider::new(config)?),
        other => bail!("Unknown provider kind: {}", other),
    };
    provider.configure(&config.options())?;
    Ok(provider)
}

// ============ Stub Provider ============

/// Deterministic provider for tests, demos, and offline use.
///
/// Without a fixed list it returns `count` candidates derived from the
/// content: `"<content> #1"`, `"<content> #2"`, ...
///
/// Options: `count` (integer ≥ 1), `latency_ms` (integer),
/// `candidates` (array of strings).
pub struct StubProvider {
    count: usize,
    latency: Duration,
    fixed: Option<Vec<String>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            count: 5,
            latency: Duration::ZERO,
            fixed: None,
        }
    }

    /// Always answer with `candidates`.
    pub fn fixed<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fixed: Some(candidates.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, request: ProviderRequest<'_>) -> Result<Vec<String>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(match &self.fixed {
            Some(list) => list.clone(),
            None => (1..=self.count)
                .map(|n| format!("{} #{}", request.content, n))
                .collect(),
        })
    }

    fn configure(&mut self, options: &ProviderOptions) -> Result<()> {
        if let Some(v) = options.get("count") {
            self.count = positive_int(v, "count")?;
        }
        if let Some(v) = options.get("latency_ms") {
            let ms = v
                .as_u64()
                .ok_or_else(|| anyhow!("latency_ms must be a non-negative integer"))?;
            self.latency = Duration::from_millis(ms);
        }
        if let Some(v) = options.get("candidates") {
            let list: Vec<String> = serde_json::from_value(v.clone())
                .map_err(|e| anyhow!("candidates must be a list of strings: {}", e))?;
            self.fixed = Some(list);
        }
        Ok(())
    }
}

// ============ OpenAI Provider ============

/// Provider backed by an OpenAI-compatible `POST {base_url}/chat/completions`.
///
/// Reads the API key from the environment variable named by
/// `provider.api_key_env` (default `OPENAI_API_KEY`).
pub struct OpenAiProvider {
    name: String,
    model: String,
    temperature: Option<f64>,
    count: usize,
    base_url: String,
    api_key: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// # Errors
    ///
    /// Returns an error if `model` is not set, the API key variable is
    /// missing, or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("provider.model required for OpenAI provider"))?;

        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow!("{} environment variable not set", config.api_key_env))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            name: format!("openai:{}", model),
            model,
            temperature: config.temperature,
            count: config.count,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_retries: config.max_retries,
            client,
        })
    }

    fn request_body(&self, request: ProviderRequest<'_>) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": prompt::build_messages(request, self.count),
        });
        if let Some(t) = self.temperature {
            body["temperature"] = serde_json::json!(t);
        }
        body
    }
}

#[async_trait]
impl SuggestionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: ProviderRequest<'_>) -> Result<Vec<String>> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(request);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                debug!(attempt, ?delay, "retrying completion request");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: Value = response.json().await?;
                        return parse_completion(&json, self.count);
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    if status.as_u16() == 429 || status.is_server_error() {
                        warn!(%status, attempt, "completion request failed, will retry");
                        last_err = Some(anyhow!("OpenAI API error {}: {}", status, body_text));
                        continue;
                    }

                    bail!("OpenAI API error {}: {}", status, body_text);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "completion request failed, will retry");
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("Completion failed after retries")))
    }

    fn configure(&mut self, options: &ProviderOptions) -> Result<()> {
        if let Some(v) = options.get("model") {
            let model = v
                .as_str()
                .ok_or_else(|| anyhow!("model must be a string"))?;
            self.model = model.to_string();
            self.name = format!("openai:{}", model);
        }
        if let Some(v) = options.get("temperature") {
            let t = v
                .as_f64()
                .ok_or_else(|| anyhow!("temperature must be a number"))?;
            if !(0.0..=2.0).contains(&t) {
                bail!("temperature must be in [0.0, 2.0]");
            }
            self.temperature = Some(t);
        }
        if let Some(v) = options.get("count") {
            self.count = positive_int(v, "count")?;
        }
        Ok(())
    }
}

/// Extract candidates from a chat-completions response.
fn parse_completion(json: &Value, count: usize) -> Result<Vec<String>> {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow!("Invalid completion response: missing choices[0].message.content"))?;
    Ok(prompt::parse_candidates(text, count))
}

fn positive_int(value: &Value, key: &str) -> Result<usize> {
    match value.as_u64() {
        Some(n) if n >= 1 => Ok(n as usize),
        _ => bail!("{} must be a positive integer", key),
    }
}
