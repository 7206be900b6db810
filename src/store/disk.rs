use crate::store::{DocumentCollection, StoreError};
use async_trait::async_trait;
use fjall::PartitionHandle;
use tracing::debug;

/// Persistent collection backed by one fjall partition.
pub struct FjallCollection {
    partition: PartitionHandle,
}

impl FjallCollection {
    pub fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }
}

#[async_trait]
impl DocumentCollection for FjallCollection {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self.partition.get(key)?;
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value.map(|v| v.to_vec()))
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.partition.insert(key, value)?;
        debug!("Store PUT for key: {key}");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let existed = self.partition.contains_key(key)?;
        self.partition.remove(key)?;
        debug!("Store REMOVE for key: {key}");
        Ok(existed)
    }

    async fn scan(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut documents = Vec::new();
        for pair in self.partition.iter() {
            let (key, value) = pair?;
            let key = String::from_utf8(key.to_vec()).map_err(|_| StoreError::InvalidKey)?;
            documents.push((key, value.to_vec()));
        }
        Ok(documents)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        // fjall has no partition-level clear; remove keys one by one.
        let mut keys = Vec::new();
        for pair in self.partition.iter() {
            let (key, _) = pair?;
            keys.push(key);
        }
        for key in keys {
            self.partition.remove(key)?;
        }
        debug!("Store CLEAR");
        Ok(())
    }
}
