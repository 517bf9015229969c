//! Core data models used throughout Wordhoard.
//!
//! Four value records flow through the engine and the store: [`Input`],
//! [`Suggestion`], [`Collection`], and [`Entry`]. None of them is mutated in
//! place. "Modifying" operations return a new value carrying the same `id`,
//! and persisting that value is the caller's job (an upsert keyed by `id`).
//!
//! Timestamps are held at millisecond precision and serialise as ISO-8601
//! UTC strings (`2024-05-01T12:00:00.123Z`), so a serialise/deserialise
//! round trip reproduces an equal value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Current time truncated to milliseconds.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format a timestamp as ISO 8601 with millisecond precision.
pub fn format_ts_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for millisecond ISO-8601 timestamps.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_ts_iso(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// What a captured [`Input`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// A word or short phrase to find alternatives for.
    Expression,
    /// A description of a meaning the user wants a word for.
    Explanation,
    /// A URL or path referencing an image.
    Image,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Expression => "expression",
            InputKind::Explanation => "explanation",
            InputKind::Image => "image",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expression" => Ok(InputKind::Expression),
            "explanation" => Ok(InputKind::Explanation),
            "image" => Ok(InputKind::Image),
            other => Err(format!(
                "unknown input kind '{}'. Use expression, explanation, or image.",
                other
            )),
        }
    }
}

/// A piece of text or an image reference submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub id: String,
    pub kind: InputKind,
    pub content: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Input {
    pub fn new(kind: InputKind, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            kind,
            content: content.into(),
            created_at: now_millis(),
        }
    }
}

/// Candidate alternatives generated for one [`Input`].
///
/// `candidates` keeps provider order and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub input_id: String,
    pub candidates: Vec<String>,
    #[serde(with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn new(input_id: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            id: new_id(),
            input_id: input_id.into(),
            candidates,
            generated_at: now_millis(),
        }
    }

    /// A copy with `candidate` appended.
    pub fn with_candidate(&self, candidate: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.candidates.push(candidate.into());
        next
    }

    /// A copy keeping only the candidates for which `keep` returns true.
    pub fn filter_candidates<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        Self {
            candidates: self
                .candidates
                .iter()
                .filter(|c| keep(c.as_str()))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// A copy with every occurrence of `candidate` removed.
    pub fn without_candidate(&self, candidate: &str) -> Self {
        self.filter_candidates(|c| c != candidate)
    }
}

/// A user-named bucket of entries. Only `name` ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now_millis(),
        }
    }

    /// A copy with a new name; `id` and `created_at` are kept.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// A saved pairing of an input and a suggestion inside a collection.
///
/// `input` and `suggestion` are snapshots taken at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub input: Input,
    pub suggestion: Suggestion,
    pub collection_id: String,
    pub tags: Vec<String>,
    #[serde(with = "iso_millis")]
    pub saved_at: DateTime<Utc>,
}

impl Entry {
    pub fn new<I, S>(
        input: Input,
        suggestion: Suggestion,
        collection_id: impl Into<String>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: new_id(),
            input,
            suggestion,
            collection_id: collection_id.into(),
            tags: normalize_tags(tags),
            saved_at: now_millis(),
        }
    }

    /// A copy with `tag` added (no-op when already present or blank).
    pub fn with_tag(&self, tag: &str) -> Self {
        self.with_tags(self.tags.iter().map(String::as_str).chain([tag]))
    }

    /// A copy with `tag` removed.
    pub fn without_tag(&self, tag: &str) -> Self {
        let tag = tag.trim();
        self.with_tags(self.tags.iter().filter(|t| t.as_str() != tag))
    }

    /// A copy whose tag set is replaced by `tags` (normalised).
    pub fn with_tags<I, S>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: normalize_tags(tags),
            ..self.clone()
        }
    }

    /// True when every tag in `required` is present (exact match).
    pub fn has_all_tags<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required
            .iter()
            .all(|r| self.tags.iter().any(|t| t == r.as_ref()))
    }
}

/// Trim, drop blanks, and de-duplicate tags keeping first occurrence.
///
/// Comparison is case-sensitive.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

/// Aggregate counts across every collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub collections: usize,
    pub entries: usize,
    /// Sum of candidate-list lengths over all saved entries.
    pub candidates: usize,
}
