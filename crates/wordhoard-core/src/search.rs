//! Entry search pipeline.
//!
//! Every [`Store`](crate::store::Store) backend funnels `search_entries`
//! and `list_entries` through this module so that filtering and ordering
//! stay identical no matter where the entries live.
//!
//! # Pipeline
//!
//! 1. Start from all entries (in insertion order).
//! 2. Keep entries in `collection_id`, when given.
//! 3. Keep entries where the lowercase query is a substring of the input
//!    content, any candidate, or any tag. Empty query matches everything.
//! 4. Keep entries carrying every requested tag (exact match).
//! 5. Sort by `saved_at` descending; ties put the newest insertion first.
//! 6. Skip `offset`, take at most `limit`.

use serde::{Deserialize, Serialize};

use crate::models::Entry;

/// Filters and pagination for a single search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Case-insensitive substring matched against content, candidates, and tags.
    #[serde(default)]
    pub query: Option<String>,
    /// Only return entries from this collection.
    #[serde(default)]
    pub collection_id: Option<String>,
    /// Entries must carry all of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Maximum results to return (unbounded when absent).
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of ranked results to skip.
    #[serde(default)]
    pub offset: Option<usize>,
}

impl SearchOptions {
    /// Options matching every entry of one collection.
    pub fn in_collection(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: Some(collection_id.into()),
            ..Default::default()
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Run the full pipeline over `entries`, given in insertion order.
pub fn search_entries<'a, I>(entries: I, opts: &SearchOptions) -> Vec<Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let query = opts
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let matched: Vec<&Entry> = entries
        .into_iter()
        .filter(|e| match &opts.collection_id {
            Some(cid) => &e.collection_id == cid,
            None => true,
        })
        .filter(|e| match &query {
            Some(q) => matches_query(e, q),
            None => true,
        })
        .filter(|e| opts.tags.is_empty() || e.has_all_tags(&opts.tags))
        .collect();

    paginate(sort_recent_first(matched), opts.offset, opts.limit)
}

/// Order entries most-recent first.
///
/// Input must be in insertion order; equal `saved_at` values end up with
/// the later insertion first.
pub fn sort_recent_first(mut entries: Vec<&Entry>) -> Vec<&Entry> {
    entries.reverse();
    entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
    entries
}

/// True when `query_lower` occurs in the content, a candidate, or a tag.
pub fn matches_query(entry: &Entry, query_lower: &str) -> bool {
    entry.input.content.to_lowercase().contains(query_lower)
        || entry
            .suggestion
            .candidates
            .iter()
            .any(|c| c.to_lowercase().contains(query_lower))
        || entry
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(query_lower))
}

fn paginate(ranked: Vec<&Entry>, offset: Option<usize>, limit: Option<usize>) -> Vec<Entry> {
    ranked
        .into_iter()
        .skip(offset.unwrap_or(0))
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}
