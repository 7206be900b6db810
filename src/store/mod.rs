//! Generic document storage with named collections.
//!
//! Documents are stored as opaque byte values (serde_json encoded by the
//! callers) under string keys. Two backends exist: an in-memory map for
//! tests and ephemeral runs, and a persistent fjall keyspace with one
//! partition per collection.

pub mod disk;
pub mod memory;

use async_trait::async_trait;
use disk::FjallCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] fjall::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored document could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("stored key is not valid UTF-8")]
    InvalidKey,
}

/// A single named collection of documents.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Removes a document, reporting whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// All key/value pairs, in key order.
    async fn scan(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// A thread-safe document store that can hold multiple collections.
pub struct DocumentStore {
    collections: RwLock<HashMap<String, Arc<dyn DocumentCollection>>>,
    keyspace: Option<Keyspace>,
}

impl DocumentStore {
    /// Opens a persistent store rooted at the given directory.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path)?;
        let keyspace = fjall::Config::new(path).open()?;

        Ok(Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: Some(keyspace),
        })
    }

    /// A store that keeps everything in memory and persists nothing.
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    pub fn collection(&self, name: &str) -> Result<Arc<dyn DocumentCollection>, StoreError> {
        if let Some(existing) = self.collections.read().unwrap().get(name) {
            return Ok(Arc::clone(existing));
        }

        let mut collections = self.collections.write().unwrap();
        // Another caller may have created it between the two locks.
        if let Some(existing) = collections.get(name) {
            return Ok(Arc::clone(existing));
        }

        let collection: Arc<dyn DocumentCollection> = match &self.keyspace {
            Some(keyspace) => {
                let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
                Arc::new(FjallCollection::new(partition))
            }
            None => Arc::new(MemoryCollection::new()),
        };

        collections.insert(name.to_string(), Arc::clone(&collection));
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_collections_are_cached_per_name() {
        let store = DocumentStore::in_memory();

        let first = store.collection("rates").unwrap();
        first.put("k", b"v").await.unwrap();

        let second = store.collection("rates").unwrap();
        assert_eq!(second.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_collections_are_isolated_by_name() {
        let store = DocumentStore::in_memory();

        store
            .collection("rates")
            .unwrap()
            .put("k", b"v")
            .await
            .unwrap();
        assert!(
            store
                .collection("saudas")
                .unwrap()
                .get("k")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_persistent_store_survives_reopen() {
        let dir = tempdir().unwrap();

        {
            let store = DocumentStore::open(dir.path()).unwrap();
            store
                .collection("rates")
                .unwrap()
                .put("k", b"v")
                .await
                .unwrap();
        }

        let store = DocumentStore::open(dir.path()).unwrap();
        assert_eq!(
            store.collection("rates").unwrap().get("k").await.unwrap(),
            Some(b"v".to_vec())
        );
    }
}
