//! Suggestion provider trait.
//!
//! A provider turns an input's kind and content into an ordered list of
//! candidate strings. The engine treats it as an opaque async call that may
//! fail; retries, timeouts, and backoff are the provider's own business.
//!
//! Concrete providers (deterministic stub, OpenAI-compatible chat API)
//! live in the `wordhoard` app crate.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Input, InputKind};

/// Open-ended provider options (model name, temperature, result count, ...).
///
/// The core enforces no schema; each provider picks out the keys it knows.
pub type ProviderOptions = BTreeMap<String, serde_json::Value>;

/// What a provider sees of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderRequest<'a> {
    pub kind: InputKind,
    pub content: &'a str,
}

impl<'a> From<&'a Input> for ProviderRequest<'a> {
    fn from(input: &'a Input) -> Self {
        Self {
            kind: input.kind,
            content: &input.content,
        }
    }
}

/// Trait for suggestion providers.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Short identifier for logs (e.g. `"stub"`, `"openai:gpt-4o-mini"`).
    fn name(&self) -> &str;

    /// Produce candidates for `request`, in preference order.
    async fn generate(&self, request: ProviderRequest<'_>) -> Result<Vec<String>>;

    /// Apply options. Unknown keys are ignored; malformed values are errors.
    fn configure(&mut self, options: &ProviderOptions) -> Result<()>;
}

#[async_trait]
impl<P: SuggestionProvider + ?Sized> SuggestionProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: ProviderRequest<'_>) -> Result<Vec<String>> {
        (**self).generate(request).await
    }

    fn configure(&mut self, options: &ProviderOptions) -> Result<()> {
        (**self).configure(options)
    }
}
