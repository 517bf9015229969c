//! Storage abstraction for Wordhoard.
//!
//! The [`Store`] trait is the seam the [`Engine`](crate::engine::Engine)
//! depends on. It owns four independent record sets (inputs, suggestions,
//! collections, entries) keyed by id, plus the composite entry search.
//!
//! Any backend (in-memory, file-backed, remote) must keep the ordering and
//! filtering rules of [`search`](crate::search) exactly; the simplest way
//! to do that is to hand entries in insertion order to
//! [`search::search_entries`](crate::search::search_entries).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Collection, Entry, Input, Suggestion};
use crate::search::SearchOptions;

/// Abstract storage backend.
///
/// All writes are single-record upserts keyed by `id`; there are no
/// multi-record transactions. Lookups return `Ok(None)` when the key is
/// absent.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`put_input`](Store::put_input) / [`get_input`](Store::get_input) | Captured inputs |
/// | [`put_suggestion`](Store::put_suggestion) / [`get_suggestion`](Store::get_suggestion) | Generated candidates |
/// | [`put_collection`](Store::put_collection) / [`get_collection`](Store::get_collection) | Named buckets |
/// | [`put_entry`](Store::put_entry) / [`get_entry`](Store::get_entry) | Saved entries |
/// | [`list_collections`](Store::list_collections) | Ascending `created_at` |
/// | [`list_entries`](Store::list_entries) | One collection, descending `saved_at` |
/// | [`update_collection`](Store::update_collection) | Rename, keeping id and `created_at` |
/// | [`delete_entry`](Store::delete_entry) | Idempotent removal |
/// | [`search_entries`](Store::search_entries) | Composite filter + pagination |
#[async_trait]
pub trait Store: Send + Sync {
    async fn put_input(&self, input: &Input) -> Result<()>;

    async fn get_input(&self, id: &str) -> Result<Option<Input>>;

    /// All inputs, oldest first.
    async fn list_inputs(&self) -> Result<Vec<Input>>;

    async fn put_suggestion(&self, suggestion: &Suggestion) -> Result<()>;

    async fn get_suggestion(&self, id: &str) -> Result<Option<Suggestion>>;

    /// Suggestions generated for one input, newest first.
    async fn list_suggestions(&self, input_id: &str) -> Result<Vec<Suggestion>>;

    async fn put_collection(&self, collection: &Collection) -> Result<()>;

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>>;

    /// All collections ordered by ascending `created_at`, insertion order on ties.
    async fn list_collections(&self) -> Result<Vec<Collection>>;

    /// Merge `patch.name` into the stored collection.
    ///
    /// The stored `id` and `created_at` win over whatever `patch` carries.
    /// Fails with [`Error::NotFound`](crate::error::Error::NotFound) when
    /// `id` is absent.
    async fn update_collection(&self, id: &str, patch: &CollectionPatch) -> Result<Collection>;

    /// Insert or replace an entry by `id`.
    async fn put_entry(&self, entry: &Entry) -> Result<()>;

    async fn get_entry(&self, id: &str) -> Result<Option<Entry>>;

    /// Entries of one collection, most recent `saved_at` first.
    async fn list_entries(&self, collection_id: &str) -> Result<Vec<Entry>>;

    /// Remove an entry. Removing an absent id is not an error.
    async fn delete_entry(&self, id: &str) -> Result<()>;

    /// Composite search; see [`crate::search`].
    async fn search_entries(&self, opts: &SearchOptions) -> Result<Vec<Entry>>;
}

/// Partial collection update accepted by [`Store::update_collection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPatch {
    pub name: Option<String>,
}

impl CollectionPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
