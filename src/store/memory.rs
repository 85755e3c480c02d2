use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::store::{KeyValueStore, StoreResult};

/// A thread-safe in-memory store. Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> StoreResult<()> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
