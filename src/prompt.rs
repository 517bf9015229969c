//! Prompt construction and completion parsing for LLM-backed providers.
//!
//! Each [`InputKind`] gets its own instruction; image inputs are sent as
//! an `image_url` content part so vision models can look at them.

use serde_json::{json, Value};
use wordhoard_core::models::InputKind;
use wordhoard_core::provider::ProviderRequest;

/// System instruction asking for exactly `count` alternatives, one per line.
pub fn system_prompt(count: usize) -> String {
    format!(
        "You are a precise thesaurus and vocabulary coach. Reply with exactly {} \
         alternatives, one per line, best first. No numbering, no commentary.",
        count
    )
}

/// User message content for `request`.
pub fn user_content(request: ProviderRequest<'_>) -> Value {
    match request.kind {
        InputKind::Expression => Value::String(format!(
            "Give alternative words or phrasings for: \"{}\"",
            request.content
        )),
        InputKind::Explanation => Value::String(format!(
            "Give single words or short expressions that mean: \"{}\"",
            request.content
        )),
        InputKind::Image => json!([
            { "type": "text", "text": "Give words or short expressions that describe this image." },
            { "type": "image_url", "image_url": { "url": request.content } }
        ]),
    }
}

/// Full chat-completions message list.
pub fn build_messages(request: ProviderRequest<'_>, count: usize) -> Value {
    json!([
        { "role": "system", "content": system_prompt(count) },
        { "role": "user", "content": user_content(request) }
    ])
}

/// Split a completion into candidates.
///
/// Strips list markers (`-`, `*`, `•`, `1.`, `2)`, each followed by
/// whitespace) and surrounding quotes, drops blank lines, and keeps at
/// most `max` items in order.
pub fn parse_candidates(text: &str, max: usize) -> Vec<String> {
    text.lines()
        .map(strip_marker)
        .map(|l| l.trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|l| !l.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim();
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            // "1.5x" is a word, "1. swift" is numbering.
            if rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    line
}
