//! In-memory [`Store`] implementation.
//!
//! Uses `HashMap` tables behind `std::sync::RwLock` for thread safety.
//! Each row remembers the sequence number of its first insertion, so
//! upserts keep their place and listings can be replayed in insertion
//! order. Entry listing and search both go through
//! [`search::search_entries`](crate::search::search_entries).

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Collection, Entry, Input, Suggestion};
use crate::search::{self, SearchOptions};

use super::{CollectionPatch, Store};

struct Table<T> {
    rows: HashMap<String, (u64, T)>,
    next_seq: u64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
        }
    }

    fn upsert(&mut self, id: &str, value: T) {
        let seq = match self.rows.get(id) {
            Some((seq, _)) => *seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.rows.insert(id.to_string(), (seq, value));
    }

    fn get(&self, id: &str) -> Option<T> {
        self.rows.get(id).map(|(_, v)| v.clone())
    }

    fn remove(&mut self, id: &str) -> Option<T> {
        self.rows.remove(id).map(|(_, v)| v)
    }

    fn in_insertion_order(&self) -> Vec<&T> {
        let mut rows: Vec<&(u64, T)> = self.rows.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, v)| v).collect()
    }
}

/// Every record held by a store, in insertion order.
///
/// Used to persist an [`InMemoryStore`] and to rebuild one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// In-memory store for tests, the CLI, and embedding in other hosts.
pub struct InMemoryStore {
    inputs: RwLock<Table<Input>>,
    suggestions: RwLock<Table<Suggestion>>,
    collections: RwLock<Table<Collection>>,
    entries: RwLock<Table<Entry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inputs: RwLock::new(Table::new()),
            suggestions: RwLock::new(Table::new()),
            collections: RwLock::new(Table::new()),
            entries: RwLock::new(Table::new()),
        }
    }

    /// Rebuild a store from a snapshot, preserving record order.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        // Freshly created locks cannot be poisoned.
        if let (Ok(mut inputs), Ok(mut suggestions), Ok(mut collections), Ok(mut entries)) = (
            store.inputs.write(),
            store.suggestions.write(),
            store.collections.write(),
            store.entries.write(),
        ) {
            for i in snapshot.inputs {
                inputs.upsert(&i.id.clone(), i);
            }
            for s in snapshot.suggestions {
                suggestions.upsert(&s.id.clone(), s);
            }
            for c in snapshot.collections {
                collections.upsert(&c.id.clone(), c);
            }
            for e in snapshot.entries {
                entries.upsert(&e.id.clone(), e);
            }
        }
        store
    }

    /// Copy every record out, in insertion order.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            inputs: read(&self.inputs)?
                .in_insertion_order()
                .into_iter()
                .cloned()
                .collect(),
            suggestions: read(&self.suggestions)?
                .in_insertion_order()
                .into_iter()
                .cloned()
                .collect(),
            collections: read(&self.collections)?
                .in_insertion_order()
                .into_iter()
                .cloned()
                .collect(),
            entries: read(&self.entries)?
                .in_insertion_order()
                .into_iter()
                .cloned()
                .collect(),
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| Error::Storage("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| Error::Storage("store lock poisoned".to_string()))
}

#[async_trait]
impl Store for InMemoryStore {
    async fn put_input(&self, input: &Input) -> Result<()> {
        write(&self.inputs)?.upsert(&input.id, input.clone());
        Ok(())
    }

    async fn get_input(&self, id: &str) -> Result<Option<Input>> {
        Ok(read(&self.inputs)?.get(id))
    }

    async fn list_inputs(&self) -> Result<Vec<Input>> {
        let inputs = read(&self.inputs)?;
        let mut out: Vec<Input> = inputs.in_insertion_order().into_iter().cloned().collect();
        out.sort_by_key(|i| i.created_at);
        Ok(out)
    }

    async fn put_suggestion(&self, suggestion: &Suggestion) -> Result<()> {
        write(&self.suggestions)?.upsert(&suggestion.id, suggestion.clone());
        Ok(())
    }

    async fn get_suggestion(&self, id: &str) -> Result<Option<Suggestion>> {
        Ok(read(&self.suggestions)?.get(id))
    }

    async fn list_suggestions(&self, input_id: &str) -> Result<Vec<Suggestion>> {
        let suggestions = read(&self.suggestions)?;
        let mut out: Vec<Suggestion> = suggestions
            .in_insertion_order()
            .into_iter()
            .rev()
            .filter(|s| s.input_id == input_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(out)
    }

    async fn put_collection(&self, collection: &Collection) -> Result<()> {
        write(&self.collections)?.upsert(&collection.id, collection.clone());
        Ok(())
    }

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>> {
        Ok(read(&self.collections)?.get(id))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let collections = read(&self.collections)?;
        let mut out: Vec<Collection> = collections
            .in_insertion_order()
            .into_iter()
            .cloned()
            .collect();
        out.sort_by_key(|c| c.created_at);
        Ok(out)
    }

    async fn update_collection(&self, id: &str, patch: &CollectionPatch) -> Result<Collection> {
        let mut collections = write(&self.collections)?;
        let current = collections
            .get(id)
            .ok_or_else(|| Error::not_found("collection", id))?;
        let updated = match &patch.name {
            Some(name) => current.renamed(name.clone()),
            None => current,
        };
        collections.upsert(id, updated.clone());
        Ok(updated)
    }

    async fn put_entry(&self, entry: &Entry) -> Result<()> {
        write(&self.entries)?.upsert(&entry.id, entry.clone());
        Ok(())
    }

    async fn get_entry(&self, id: &str) -> Result<Option<Entry>> {
        Ok(read(&self.entries)?.get(id))
    }

    async fn list_entries(&self, collection_id: &str) -> Result<Vec<Entry>> {
        self.search_entries(&SearchOptions::in_collection(collection_id))
            .await
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        write(&self.entries)?.remove(id);
        Ok(())
    }

    async fn search_entries(&self, opts: &SearchOptions) -> Result<Vec<Entry>> {
        let entries = read(&self.entries)?;
        Ok(search::search_entries(entries.in_insertion_order(), opts))
    }
}
