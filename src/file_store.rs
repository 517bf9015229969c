//! JSON-snapshot [`Store`] backed by a single file.
//!
//! All reads, ordering, and search are delegated to an [`InMemoryStore`].
//! A write is applied to a staged copy first; the copy's snapshot is written
//! to disk (temp file, then rename) and only then is the live store
//! updated, so a failed write leaves neither memory nor disk changed.
//! A missing file is an empty store.
//!
//! The on-disk layout is the core [`Snapshot`]:
//!
//! ```json
//! { "inputs": [...], "suggestions": [...], "collections": [...], "entries": [...] }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use wordhoard_core::error::{Error, Result};
use wordhoard_core::models::{Collection, Entry, Input, Suggestion};
use wordhoard_core::search::SearchOptions;
use wordhoard_core::store::memory::{InMemoryStore, Snapshot};
use wordhoard_core::store::{CollectionPatch, Store};

/// Store that persists an in-memory store to a JSON file.
pub struct FileStore {
    path: PathBuf,
    inner: InMemoryStore,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the snapshot at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            let snapshot: Snapshot = if raw.trim().is_empty() {
                Snapshot::default()
            } else {
                serde_json::from_str(&raw)?
            };
            debug!(
                path = %path.display(),
                entries = snapshot.entries.len(),
                "loaded snapshot"
            );
            InMemoryStore::from_snapshot(snapshot)
        } else {
            InMemoryStore::new()
        };
        Ok(Self {
            path,
            inner,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A detached copy of the live store to apply a write to.
    fn stage(&self) -> Result<InMemoryStore> {
        Ok(InMemoryStore::from_snapshot(self.inner.snapshot()?))
    }

    /// Write `staged` to disk. Callers hold `write_lock`.
    fn persist(&self, staged: &InMemoryStore) -> Result<()> {
        let json = serde_json::to_string_pretty(&staged.snapshot()?)?;
        self.write_file(&json).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "snapshot write failed");
            e
        })
    }

    fn write_file(&self, json: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            io_error(&self.path, e)
        })
    }
}

fn io_error(path: &Path, e: std::io::Error) -> Error {
    Error::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl Store for FileStore {
    async fn put_input(&self, input: &Input) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage()?;
        staged.put_input(input).await?;
        self.persist(&staged)?;
        self.inner.put_input(input).await
    }

    async fn get_input(&self, id: &str) -> Result<Option<Input>> {
        self.inner.get_input(id).await
    }

    async fn list_inputs(&self) -> Result<Vec<Input>> {
        self.inner.list_inputs().await
    }

    async fn put_suggestion(&self, suggestion: &Suggestion) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage()?;
        staged.put_suggestion(suggestion).await?;
        self.persist(&staged)?;
        self.inner.put_suggestion(suggestion).await
    }

    async fn get_suggestion(&self, id: &str) -> Result<Option<Suggestion>> {
        self.inner.get_suggestion(id).await
    }

    async fn list_suggestions(&self, input_id: &str) -> Result<Vec<Suggestion>> {
        self.inner.list_suggestions(input_id).await
    }

    async fn put_collection(&self, collection: &Collection) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage()?;
        staged.put_collection(collection).await?;
        self.persist(&staged)?;
        self.inner.put_collection(collection).await
    }

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>> {
        self.inner.get_collection(id).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.inner.list_collections().await
    }

    async fn update_collection(&self, id: &str, patch: &CollectionPatch) -> Result<Collection> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage()?;
        staged.update_collection(id, patch).await?;
        self.persist(&staged)?;
        self.inner.update_collection(id, patch).await
    }

    async fn put_entry(&self, entry: &Entry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage()?;
        staged.put_entry(entry).await?;
        self.persist(&staged)?;
        self.inner.put_entry(entry).await
    }

    async fn get_entry(&self, id: &str) -> Result<Option<Entry>> {
        self.inner.get_entry(id).await
    }

    async fn list_entries(&self, collection_id: &str) -> Result<Vec<Entry>> {
        self.inner.list_entries(collection_id).await
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage()?;
        staged.delete_entry(id).await?;
        self.persist(&staged)?;
        self.inner.delete_entry(id).await
    }

    async fn search_entries(&self, opts: &SearchOptions) -> Result<Vec<Entry>> {
        self.inner.search_entries(opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wordhoard_core::models::InputKind;

    fn entry_in(collection: &Collection, content: &str, tags: &[&str]) -> Entry {
        let input = Input::new(InputKind::Expression, content);
        let suggestion = Suggestion::new(&input.id, vec![format!("{} alt", content)]);
        Entry::new(input, suggestion, &collection.id, tags.iter().copied())
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path().join("none.json")).unwrap();
        assert!(store.list_collections().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_reopen_preserves_rows_and_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("store.json");
        let collection = Collection::new("C1");
        let first = entry_in(&collection, "one", &["a"]);
        let second = entry_in(&collection, "two", &[]);

        {
            let store = FileStore::open(&path).unwrap();
            store.put_collection(&collection).await.unwrap();
            store.put_input(&first.input).await.unwrap();
            store.put_suggestion(&first.suggestion).await.unwrap();
            store.put_entry(&first).await.unwrap();
            store.put_entry(&second).await.unwrap();
        }
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_collection(&collection.id).await.unwrap(),
            Some(collection.clone())
        );
        assert_eq!(
            reopened.get_input(&first.input.id).await.unwrap(),
            Some(first.input.clone())
        );

        let listed: Vec<String> = reopened
            .list_entries(&collection.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(listed, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(
            reopened.get_entry(&first.id).await.unwrap().unwrap().tags,
            vec!["a"]
        );
    }

    #[tokio::test]
    async fn test_delete_and_rename_are_flushed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let collection = Collection::new("Draft");
        let entry = entry_in(&collection, "gone", &[]);

        {
            let store = FileStore::open(&path).unwrap();
            store.put_collection(&collection).await.unwrap();
            store.put_entry(&entry).await.unwrap();
            store
                .update_collection(&collection.id, &CollectionPatch::rename("Final"))
                .await
                .unwrap();
            store.delete_entry(&entry.id).await.unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        let renamed = reopened.get_collection(&collection.id).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Final");
        assert_eq!(renamed.created_at, collection.created_at);
        assert!(reopened.get_entry(&entry.id).await.unwrap().is_none());
    }

    /// Put a non-empty directory where the snapshot file goes so the
    /// final rename fails.
    fn block_path(path: &Path) {
        let _ = std::fs::remove_file(path);
        std::fs::create_dir_all(path.join("occupied")).unwrap();
    }

    fn unblock_path(path: &Path) {
        std::fs::remove_dir_all(path).unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_is_not_committed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let collection = Collection::new("C1");
        let entry = entry_in(&collection, "lost", &[]);

        let store = FileStore::open(&path).unwrap();
        store.put_collection(&collection).await.unwrap();

        block_path(&path);
        let err = store.put_entry(&entry).await.unwrap_err();
        assert_eq!(err.kind(), "storage");
        assert!(store.get_entry(&entry.id).await.unwrap().is_none());
        assert!(store.list_entries(&collection.id).await.unwrap().is_empty());

        // The next successful write must not carry the failed one along.
        unblock_path(&path);
        store.put_collection(&Collection::new("D")).await.unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get_entry(&entry.id).await.unwrap().is_none());
        assert_eq!(reopened.list_collections().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_and_rename_are_rolled_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let collection = Collection::new("Draft");
        let entry = entry_in(&collection, "kept", &[]);

        let store = FileStore::open(&path).unwrap();
        store.put_collection(&collection).await.unwrap();
        store.put_entry(&entry).await.unwrap();

        block_path(&path);
        assert!(store.delete_entry(&entry.id).await.is_err());
        assert!(store
            .update_collection(&collection.id, &CollectionPatch::rename("Final"))
            .await
            .is_err());
        assert!(store.get_entry(&entry.id).await.unwrap().is_some());
        assert_eq!(
            store.get_collection(&collection.id).await.unwrap().unwrap().name,
            "Draft"
        );
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = FileStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), "serialization");
    }
}
