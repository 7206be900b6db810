use crate::store::{DocumentCollection, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection backed by a BTreeMap, so scans come out key-ordered.
pub struct MemoryCollection {
    inner: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.inner.lock().await;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value)
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        debug!("Store PUT for key: {key}");
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut map = self.inner.lock().await;
        debug!("Store REMOVE for key: {key}");
        Ok(map.remove(key).is_some())
    }

    async fn scan(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let map = self.inner.lock().await;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        debug!("Store CLEAR");
        map.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_put() {
        let col = MemoryCollection::new();

        // Initially, the collection is empty
        assert!(col.get("key1").await.unwrap().is_none());

        col.put("key1", b"123").await.unwrap();
        assert_eq!(col.get("key1").await.unwrap(), Some(b"123".to_vec()));

        // Get a non-existent key
        assert!(col.get("key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let col = MemoryCollection::new();

        col.put("key1", b"123").await.unwrap();
        assert!(col.remove("key1").await.unwrap());
        assert!(!col.remove("key1").await.unwrap());
        assert!(col.get("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_is_key_ordered() {
        let col = MemoryCollection::new();

        col.put("b", b"2").await.unwrap();
        col.put("a", b"1").await.unwrap();
        col.put("c", b"3").await.unwrap();

        let keys: Vec<String> = col
            .scan()
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let col = MemoryCollection::new();

        col.put("key1", b"123").await.unwrap();
        col.put("key2", b"456").await.unwrap();

        col.clear().await.unwrap();

        assert!(col.get("key1").await.unwrap().is_none());
        assert!(col.scan().await.unwrap().is_empty());
    }
}
