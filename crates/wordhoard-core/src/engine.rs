//! Orchestration engine.
//!
//! [`Engine`] is the only component that knows how inputs, suggestions,
//! collections, and entries relate. Each operation validates its
//! arguments, resolves references through the [`Store`], calls the
//! [`SuggestionProvider`] at most once, and performs at most one store
//! write. A failed operation leaves the store untouched.
//!
//! The engine holds no state of its own beyond its two handles, so any
//! number of independent engines (each with its own store) can coexist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{self, Collection, Entry, Input, InputKind, Stats, Suggestion};
use crate::provider::{ProviderOptions, ProviderRequest, SuggestionProvider};
use crate::search::SearchOptions;
use crate::store::{CollectionPatch, Store};

/// A collection together with its entries, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionExport {
    pub collection: Collection,
    pub entries: Vec<Entry>,
    #[serde(with = "models::iso_millis")]
    pub exported_at: DateTime<Utc>,
}

/// Vocabulary engine over a store and a suggestion provider.
pub struct Engine<S, P> {
    store: S,
    provider: P,
}

impl<S: Store, P: SuggestionProvider> Engine<S, P> {
    pub fn new(store: S, provider: P) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Forward open-ended options to the provider.
    pub fn configure_provider(&mut self, options: &ProviderOptions) -> Result<()> {
        self.provider
            .configure(options)
            .map_err(|e| Error::Provider(format!("{:#}", e)))
    }

    // ── Inputs ──────────────────────────────────────────────────────

    /// Capture `content` (trimmed) as a new input.
    pub async fn add_input(&self, kind: InputKind, content: &str) -> Result<Input> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::Validation("input content must not be empty".into()));
        }
        let input = Input::new(kind, content);
        self.store.put_input(&input).await?;
        info!(input_id = %input.id, kind = %kind, "input added");
        Ok(input)
    }

    pub async fn get_input(&self, id: &str) -> Result<Input> {
        self.store
            .get_input(id)
            .await?
            .ok_or_else(|| Error::not_found("input", id))
    }

    pub async fn list_inputs(&self) -> Result<Vec<Input>> {
        self.store.list_inputs().await
    }

    // ── Suggestions ─────────────────────────────────────────────────

    /// Ask the provider for candidates and persist them as a suggestion.
    ///
    /// Candidates are trimmed and blanks dropped; if nothing is left the call fails
    /// with [`Error::Provider`]. Failures are not retried.
    pub async fn generate_suggestions(&self, input_id: &str) -> Result<Suggestion> {
        let input = self.get_input(input_id).await?;

        debug!(input_id, provider = self.provider.name(), "requesting suggestions");
        let raw = self
            .provider
            .generate(ProviderRequest::from(&input))
            .await
            .map_err(|e| {
                warn!(input_id, error = %e, "suggestion provider failed");
                Error::Provider(format!("{:#}", e))
            })?;

        let candidates: Vec<String> = raw
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if candidates.is_empty() {
            warn!(input_id, "suggestion provider returned no candidates");
            return Err(Error::Provider(format!(
                "{} returned no candidates",
                self.provider.name()
            )));
        }

        let suggestion = Suggestion::new(&input.id, candidates);
        self.store.put_suggestion(&suggestion).await?;
        info!(
            suggestion_id = %suggestion.id,
            input_id,
            count = suggestion.candidates.len(),
            "suggestions generated"
        );
        Ok(suggestion)
    }

    pub async fn get_suggestion(&self, id: &str) -> Result<Suggestion> {
        self.store
            .get_suggestion(id)
            .await?
            .ok_or_else(|| Error::not_found("suggestion", id))
    }

    /// Suggestions generated for one input, newest first.
    pub async fn list_suggestions(&self, input_id: &str) -> Result<Vec<Suggestion>> {
        self.get_input(input_id).await?;
        self.store.list_suggestions(input_id).await
    }

    /// Narrow a suggestion to the candidates listed in `keep`.
    ///
    /// The replacement keeps the suggestion's id and original order.
    pub async fn refine_suggestion<T: AsRef<str>>(
        &self,
        suggestion_id: &str,
        keep: &[T],
    ) -> Result<Suggestion> {
        let current = self.get_suggestion(suggestion_id).await?;
        let refined = current.filter_candidates(|c| keep.iter().any(|k| k.as_ref() == c));
        if refined.candidates.is_empty() {
            return Err(Error::Validation(
                "refinement would leave no candidates".into(),
            ));
        }
        self.store.put_suggestion(&refined).await?;
        info!(
            suggestion_id,
            kept = refined.candidates.len(),
            dropped = current.candidates.len() - refined.candidates.len(),
            "suggestion refined"
        );
        Ok(refined)
    }

    // ── Collections ─────────────────────────────────────────────────

    pub async fn create_collection(&self, name: &str) -> Result<Collection> {
        let name = validate_name(name)?;
        let collection = Collection::new(name);
        self.store.put_collection(&collection).await?;
        info!(collection_id = %collection.id, name, "collection created");
        Ok(collection)
    }

    pub async fn rename_collection(&self, id: &str, new_name: &str) -> Result<Collection> {
        let name = validate_name(new_name)?;
        self.require_collection(id).await?;
        let renamed = self
            .store
            .update_collection(id, &CollectionPatch::rename(name))
            .await?;
        info!(collection_id = id, name, "collection renamed");
        Ok(renamed)
    }

    pub async fn get_collection(&self, id: &str) -> Result<Collection> {
        self.require_collection(id).await
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.store.list_collections().await
    }

    // ── Entries ─────────────────────────────────────────────────────

    /// Save a suggestion for an input into a collection.
    ///
    /// All three references must resolve, and the suggestion must have
    /// been generated for this input. Tags are trimmed, blanks dropped,
    /// and duplicates removed keeping first occurrence.
    pub async fn save_entry<T: AsRef<str>>(
        &self,
        input_id: &str,
        suggestion_id: &str,
        collection_id: &str,
        tags: &[T],
    ) -> Result<Entry> {
        let input = self.get_input(input_id).await?;
        let suggestion = self.get_suggestion(suggestion_id).await?;
        self.require_collection(collection_id).await?;

        if suggestion.input_id != input.id {
            return Err(Error::ReferentialIntegrity(format!(
                "suggestion {} does not belong to input {}",
                suggestion.id, input.id
            )));
        }

        let entry = Entry::new(input, suggestion, collection_id, tags.iter().map(|t| t.as_ref()));
        self.store.put_entry(&entry).await?;
        info!(
            entry_id = %entry.id,
            collection_id,
            tags = entry.tags.len(),
            "entry saved"
        );
        Ok(entry)
    }

    pub async fn get_entry(&self, id: &str) -> Result<Entry> {
        self.store
            .get_entry(id)
            .await?
            .ok_or_else(|| Error::not_found("entry", id))
    }

    /// Entries of a collection, most recently saved first.
    pub async fn list_entries(&self, collection_id: &str) -> Result<Vec<Entry>> {
        self.require_collection(collection_id).await?;
        self.store.list_entries(collection_id).await
    }

    /// Substring search within one collection.
    ///
    /// An absent or empty query returns exactly what [`list_entries`](Self::list_entries) does.
    pub async fn search_entries(
        &self,
        collection_id: &str,
        query: Option<&str>,
    ) -> Result<Vec<Entry>> {
        match query.filter(|q| !q.is_empty()) {
            None => self.list_entries(collection_id).await,
            Some(q) => {
                self.require_collection(collection_id).await?;
                self.store
                    .search_entries(&SearchOptions::in_collection(collection_id).query(q))
                    .await
            }
        }
    }

    /// Full composite search (query, tags, pagination) across collections.
    pub async fn query_entries(&self, opts: &SearchOptions) -> Result<Vec<Entry>> {
        if let Some(cid) = &opts.collection_id {
            self.require_collection(cid).await?;
        }
        let results = self.store.search_entries(opts).await?;
        debug!(hits = results.len(), "entry query");
        Ok(results)
    }

    /// Add tags to an entry.
    pub async fn tag_entry<T: AsRef<str>>(&self, entry_id: &str, tags: &[T]) -> Result<Entry> {
        let entry = self.get_entry(entry_id).await?;
        let updated = entry.with_tags(
            entry
                .tags
                .iter()
                .map(String::as_str)
                .chain(tags.iter().map(|t| t.as_ref())),
        );
        self.replace_entry(updated).await
    }

    /// Remove tags from an entry. Tags it does not carry are ignored.
    pub async fn untag_entry<T: AsRef<str>>(&self, entry_id: &str, tags: &[T]) -> Result<Entry> {
        let entry = self.get_entry(entry_id).await?;
        let updated = tags
            .iter()
            .fold(entry, |acc, tag| acc.without_tag(tag.as_ref()));
        self.replace_entry(updated).await
    }

    /// Replace an entry's whole tag set.
    pub async fn retag_entry<T: AsRef<str>>(&self, entry_id: &str, tags: &[T]) -> Result<Entry> {
        let entry = self.get_entry(entry_id).await?;
        self.replace_entry(entry.with_tags(tags.iter().map(|t| t.as_ref())))
            .await
    }

    pub async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        self.get_entry(entry_id).await?;
        self.store.delete_entry(entry_id).await?;
        info!(entry_id, "entry deleted");
        Ok(())
    }

    // ── Reporting ───────────────────────────────────────────────────

    /// Count collections, entries, and saved candidates.
    pub async fn get_stats(&self) -> Result<Stats> {
        let mut stats = Stats::default();
        for collection in self.store.list_collections().await? {
            stats.collections += 1;
            for entry in self.store.list_entries(&collection.id).await? {
                stats.entries += 1;
                stats.candidates += entry.suggestion.candidates.len();
            }
        }
        Ok(stats)
    }

    pub async fn export_collection(&self, collection_id: &str) -> Result<CollectionExport> {
        let collection = self.require_collection(collection_id).await?;
        let entries = self.store.list_entries(collection_id).await?;
        Ok(CollectionExport {
            collection,
            entries,
            exported_at: models::now_millis(),
        })
    }

    async fn require_collection(&self, id: &str) -> Result<Collection> {
        self.store
            .get_collection(id)
            .await?
            .ok_or_else(|| Error::not_found("collection", id))
    }

    async fn replace_entry(&self, entry: Entry) -> Result<Entry> {
        self.store.put_entry(&entry).await?;
        debug!(entry_id = %entry.id, tags = ?entry.tags, "entry tags updated");
        Ok(entry)
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("collection name must not be empty".into()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::Duration;

    struct FixedProvider {
        candidates: Vec<String>,
    }

    #[async_trait]
    impl SuggestionProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: ProviderRequest<'_>) -> anyhow::Result<Vec<String>> {
            Ok(self.candidates.clone())
        }

        fn configure(&mut self, options: &ProviderOptions) -> anyhow::Result<()> {
            if let Some(list) = options.get("candidates") {
                self.candidates = serde_json::from_value(list.clone())?;
            }
            Ok(())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SuggestionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _request: ProviderRequest<'_>) -> anyhow::Result<Vec<String>> {
            bail!("upstream unavailable")
        }

        fn configure(&mut self, _options: &ProviderOptions) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn engine_with(candidates: &[&str]) -> Engine<InMemoryStore, FixedProvider> {
        Engine::new(
            InMemoryStore::new(),
            FixedProvider {
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            },
        )
    }

    async fn saved_entry(
        engine: &Engine<InMemoryStore, FixedProvider>,
        collection_id: &str,
        content: &str,
        tags: &[&str],
    ) -> Entry {
        let input = engine.add_input(InputKind::Expression, content).await.unwrap();
        let suggestion = engine.generate_suggestions(&input.id).await.unwrap();
        engine
            .save_entry(&input.id, &suggestion.id, collection_id, tags)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_input_trims_and_assigns_unique_ids() {
        let engine = engine_with(&["a"]);
        let a = engine.add_input(InputKind::Expression, "  hello  ").await.unwrap();
        let b = engine.add_input(InputKind::Expression, "hello").await.unwrap();
        assert_eq!(a.content, "hello");
        assert_ne!(a.id, b.id);
        assert_eq!(engine.get_input(&a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_add_input_rejects_blank() {
        let engine = engine_with(&["a"]);
        for content in ["", "   "] {
            let err = engine.add_input(InputKind::Explanation, content).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(engine.list_inputs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_unknown_input() {
        let engine = engine_with(&["a"]);
        let err = engine.generate_suggestions("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "input", .. }));
    }

    #[tokio::test]
    async fn test_generate_links_to_input() {
        let engine = engine_with(&["a", "b", "a"]);
        let input = engine.add_input(InputKind::Image, "https://x/cat.png").await.unwrap();
        let s = engine.generate_suggestions(&input.id).await.unwrap();
        assert_eq!(s.input_id, input.id);
        assert_eq!(s.candidates, vec!["a", "b", "a"]);
        assert_eq!(engine.get_suggestion(&s.id).await.unwrap(), s);
    }

    #[tokio::test]
    async fn test_generate_provider_failure() {
        let engine = Engine::new(InMemoryStore::new(), FailingProvider);
        let input = engine.add_input(InputKind::Expression, "x").await.unwrap();
        let err = engine.generate_suggestions(&input.id).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ref m) if m.contains("upstream unavailable")));
        assert!(engine.list_suggestions(&input.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_empty_candidates_is_provider_error() {
        let engine = engine_with(&[" ", ""]);
        let input = engine.add_input(InputKind::Expression, "x").await.unwrap();
        let err = engine.generate_suggestions(&input.id).await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn test_generate_trims_candidates() {
        let engine = engine_with(&["  swift ", "\tquick", " ", "rapid"]);
        let input = engine.add_input(InputKind::Expression, "fast").await.unwrap();
        let s = engine.generate_suggestions(&input.id).await.unwrap();
        assert_eq!(s.candidates, vec!["swift", "quick", "rapid"]);
    }

    #[tokio::test]
    async fn test_configure_provider_forwards_options() {
        let mut engine = engine_with(&["a"]);
        let mut options = ProviderOptions::new();
        options.insert("candidates".into(), serde_json::json!(["p", "q"]));
        engine.configure_provider(&options).unwrap();
        let input = engine.add_input(InputKind::Expression, "x").await.unwrap();
        let s = engine.generate_suggestions(&input.id).await.unwrap();
        assert_eq!(s.candidates, vec!["p", "q"]);
    }

    #[tokio::test]
    async fn test_collection_names_validated() {
        let engine = engine_with(&["a"]);
        assert!(matches!(
            engine.create_collection("  ").await.unwrap_err(),
            Error::Validation(_)
        ));
        let c = engine.create_collection(" Birds ").await.unwrap();
        assert_eq!(c.name, "Birds");
        assert!(matches!(
            engine.rename_collection(&c.id, "").await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            engine.rename_collection("missing", "x").await.unwrap_err(),
            Error::NotFound { kind: "collection", .. }
        ));
        let renamed = engine.rename_collection(&c.id, "Raptors").await.unwrap();
        assert_eq!(renamed.id, c.id);
        assert_eq!(renamed.created_at, c.created_at);
        assert_eq!(renamed.name, "Raptors");
    }

    #[tokio::test]
    async fn test_scenario_save_with_duplicate_tags() {
        let engine = engine_with(&["a", "b"]);
        let c1 = engine.create_collection("C1").await.unwrap();
        let input = engine.add_input(InputKind::Expression, "hello world").await.unwrap();
        let s = engine.generate_suggestions(&input.id).await.unwrap();
        assert_eq!(s.candidates, vec!["a", "b"]);

        let entry = engine
            .save_entry(&input.id, &s.id, &c1.id, &["x", "x", "y"])
            .await
            .unwrap();
        assert_eq!(entry.tags, vec!["x", "y"]);
        assert_eq!(entry.input, input);
        assert_eq!(entry.suggestion, s);
        assert_eq!(entry.collection_id, c1.id);
    }

    #[tokio::test]
    async fn test_save_entry_missing_references() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        let input = engine.add_input(InputKind::Expression, "x").await.unwrap();
        let s = engine.generate_suggestions(&input.id).await.unwrap();
        let none: &[&str] = &[];

        let err = engine.save_entry("nope", &s.id, &c.id, none).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "input", .. }));
        let err = engine.save_entry(&input.id, "nope", &c.id, none).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "suggestion", .. }));
        let err = engine.save_entry(&input.id, &s.id, "nope", none).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "collection", .. }));
    }

    #[tokio::test]
    async fn test_save_entry_mismatched_suggestion() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        let first = engine.add_input(InputKind::Expression, "one").await.unwrap();
        let second = engine.add_input(InputKind::Expression, "two").await.unwrap();
        let s = engine.generate_suggestions(&second.id).await.unwrap();

        let err = engine
            .save_entry(&first.id, &s.id, &c.id, &["t"])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReferentialIntegrity(_)));
        assert!(engine.list_entries(&c.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_search_require_collection() {
        let engine = engine_with(&["a"]);
        assert!(matches!(
            engine.list_entries("missing").await.unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            engine.search_entries("missing", Some("q")).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        let opts = SearchOptions::in_collection("missing");
        assert!(matches!(
            engine.query_entries(&opts).await.unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_search_equals_list() {
        let engine = engine_with(&["alpha", "beta"]);
        let c = engine.create_collection("C").await.unwrap();
        for content in ["one", "two", "three"] {
            saved_entry(&engine, &c.id, content, &[]).await;
        }
        let listed = engine.list_entries(&c.id).await.unwrap();
        assert_eq!(engine.search_entries(&c.id, Some("")).await.unwrap(), listed);
        assert_eq!(engine.search_entries(&c.id, None).await.unwrap(), listed);
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn test_search_scoped_to_collection() {
        let engine = engine_with(&["alpha"]);
        let c1 = engine.create_collection("C1").await.unwrap();
        let c2 = engine.create_collection("C2").await.unwrap();
        saved_entry(&engine, &c1.id, "hello world", &["greeting"]).await;
        saved_entry(&engine, &c2.id, "hello there", &[]).await;
        saved_entry(&engine, &c1.id, "goodbye", &[]).await;

        let hits = engine.search_entries(&c1.id, Some("HELLO")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].input.content, "hello world");

        let by_candidate = engine.search_entries(&c1.id, Some("alph")).await.unwrap();
        assert_eq!(by_candidate.len(), 2);
    }

    #[tokio::test]
    async fn test_query_entries_pagination() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        let base = models::now_millis();
        for i in 0..10 {
            let mut e = saved_entry(&engine, &c.id, &format!("e{}", i), &[]).await;
            e.saved_at = base + Duration::seconds(i);
            engine.store().put_entry(&e).await.unwrap();
        }
        let page = engine
            .query_entries(&SearchOptions::in_collection(&c.id).page(3, 4))
            .await
            .unwrap();
        let names: Vec<&str> = page.iter().map(|e| e.input.content.as_str()).collect();
        assert_eq!(names, vec!["e5", "e4", "e3"]);
    }

    #[tokio::test]
    async fn test_query_entries_tag_and() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        saved_entry(&engine, &c.id, "tagged", &["a", "b", "c"]).await;

        let ab = SearchOptions::default().tags(["a", "b"]);
        assert_eq!(engine.query_entries(&ab).await.unwrap().len(), 1);
        let ad = SearchOptions::default().tags(["a", "d"]);
        assert!(engine.query_entries(&ad).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tag_untag_retag() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        let entry = saved_entry(&engine, &c.id, "x", &["one"]).await;

        let tagged = engine.tag_entry(&entry.id, &["two", "one", " "]).await.unwrap();
        assert_eq!(tagged.id, entry.id);
        assert_eq!(tagged.tags, vec!["one", "two"]);

        let untagged = engine.untag_entry(&entry.id, &["one", "absent"]).await.unwrap();
        assert_eq!(untagged.tags, vec!["two"]);

        let retagged = engine.retag_entry(&entry.id, &["z", "z"]).await.unwrap();
        assert_eq!(retagged.tags, vec!["z"]);
        assert_eq!(engine.get_entry(&entry.id).await.unwrap(), retagged);
        assert_eq!(engine.list_entries(&c.id).await.unwrap().len(), 1);

        assert!(matches!(
            engine.tag_entry("missing", &["t"]).await.unwrap_err(),
            Error::NotFound { kind: "entry", .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        assert!(matches!(
            engine.delete_entry("missing").await.unwrap_err(),
            Error::NotFound { kind: "entry", .. }
        ));

        let entry = saved_entry(&engine, &c.id, "x", &[]).await;
        engine.delete_entry(&entry.id).await.unwrap();
        assert!(matches!(
            engine.delete_entry(&entry.id).await.unwrap_err(),
            Error::NotFound { kind: "entry", .. }
        ));
        assert!(engine.list_entries(&c.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refine_suggestion() {
        let engine = engine_with(&["a", "b", "c", "b"]);
        let input = engine.add_input(InputKind::Expression, "x").await.unwrap();
        let s = engine.generate_suggestions(&input.id).await.unwrap();

        let refined = engine.refine_suggestion(&s.id, &["b", "c"]).await.unwrap();
        assert_eq!(refined.id, s.id);
        assert_eq!(refined.candidates, vec!["b", "c", "b"]);
        assert_eq!(engine.get_suggestion(&s.id).await.unwrap(), refined);

        let err = engine.refine_suggestion(&s.id, &["zzz"]).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_stats() {
        let engine = engine_with(&["a", "b", "c"]);
        assert_eq!(engine.get_stats().await.unwrap(), Stats::default());

        let c1 = engine.create_collection("C1").await.unwrap();
        let c2 = engine.create_collection("C2").await.unwrap();
        engine.create_collection("empty").await.unwrap();
        saved_entry(&engine, &c1.id, "x", &[]).await;
        saved_entry(&engine, &c1.id, "y", &[]).await;
        saved_entry(&engine, &c2.id, "z", &[]).await;

        let stats = engine.get_stats().await.unwrap();
        assert_eq!(
            stats,
            Stats {
                collections: 3,
                entries: 3,
                candidates: 9
            }
        );
    }

    #[tokio::test]
    async fn test_export_collection() {
        let engine = engine_with(&["a"]);
        let c = engine.create_collection("C").await.unwrap();
        saved_entry(&engine, &c.id, "x", &["t"]).await;
        let export = engine.export_collection(&c.id).await.unwrap();
        assert_eq!(export.collection, c);
        assert_eq!(export.entries, engine.list_entries(&c.id).await.unwrap());

        let json = serde_json::to_string(&export).unwrap();
        let back: CollectionExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, export);
    }

    #[tokio::test]
    async fn test_engines_are_isolated() {
        let a = engine_with(&["a"]);
        let b = engine_with(&["a"]);
        a.create_collection("only-in-a").await.unwrap();
        assert_eq!(a.list_collections().await.unwrap().len(), 1);
        assert!(b.list_collections().await.unwrap().is_empty());
    }
}
