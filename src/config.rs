//! TOML configuration parsing and validation.
//!
//! Every section is optional; missing keys fall back to the defaults
//! below, so an empty file is a valid configuration (stub provider,
//! snapshot at `./data/wordhoard.json`).
//!
//! ```toml
//! [store]
//! path = "./data/wordhoard.json"
//!
//! [provider]
//! kind = "openai"
//! model = "gpt-4o-mini"
//! temperature = 0.7
//! count = 5
//!
//! [search]
//! default_limit = 20
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use wordhoard_core::provider::ProviderOptions;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/wordhoard.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_kind")]
    pub kind: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            model: None,
            temperature: None,
            count: default_count(),
            latency_ms: 0,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_provider_kind() -> String {
    "stub".to_string()
}
fn default_count() -> usize {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl ProviderConfig {
    /// The tunables every provider understands, as an open-ended option map.
    pub fn options(&self) -> ProviderOptions {
        let mut options = ProviderOptions::new();
        options.insert("count".into(), serde_json::json!(self.count));
        options.insert("latency_ms".into(), serde_json::json!(self.latency_ms));
        if let Some(model) = &self.model {
            options.insert("model".into(), serde_json::json!(model));
        }
        if let Some(t) = self.temperature {
            options.insert("temperature".into(), serde_json::json!(t));
        }
        options
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

/// Parse and validate a configuration string.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load the config file at `path`.
///
/// A missing file yields [`Config::default`]; an unreadable or invalid
/// one is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

fn validate(config: &Config) -> Result<()> {
    if config.provider.count == 0 {
        anyhow::bail!("provider.count must be > 0");
    }

    if let Some(t) = config.provider.temperature {
        if !(0.0..=2.0).contains(&t) {
            anyhow::bail!("provider.temperature must be in [0.0, 2.0]");
        }
    }

    if config.search.default_limit < 1 {
        anyhow::bail!("search.default_limit must be >= 1");
    }

    match config.provider.kind.as_str() {
        "stub" => {}
        "openai" => {
            if config.provider.model.is_none() {
                anyhow::bail!("provider.model must be specified when provider is 'openai'");
            }
        }
        other => anyhow::bail!(
            "Unknown provider kind: '{}'. Must be stub or openai.",
            other
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.provider.kind, "stub");
        assert_eq!(config.provider.count, 5);
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.store.path, PathBuf::from("./data/wordhoard.json"));
    }

    #[test]
    fn test_openai_requires_model() {
        let err = parse_config("[provider]\nkind = \"openai\"\n").unwrap_err();
        assert!(err.to_string().contains("provider.model"));
        let ok = parse_config("[provider]\nkind = \"openai\"\nmodel = \"gpt-4o-mini\"\n");
        assert!(ok.is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("[provider]\ncount = 0\n").is_err());
        assert!(parse_config("[provider]\ntemperature = 3.5\n").is_err());
        assert!(parse_config("[provider]\nkind = \"llama\"\n").is_err());
        assert!(parse_config("[search]\ndefault_limit = 0\n").is_err());
    }

    #[test]
    fn test_provider_options_map() {
        let config =
            parse_config("[provider]\nmodel = \"m\"\ntemperature = 0.5\ncount = 3\n").unwrap();
        let options = config.provider.options();
        assert_eq!(options["model"], "m");
        assert_eq!(options["count"], 3);
        assert_eq!(options["temperature"], 0.5);
        assert_eq!(options["latency_ms"], 0);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = load_config(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.provider.kind, "stub");
    }
}
