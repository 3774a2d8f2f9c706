use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use anyhow::Result;
use serde_json::Value;

use crate::db::Database;

pub mod file;
pub mod history;

pub use file::JsonFileStore;
pub use history::{HistoryStore, STORAGE_KEY};

/// Persistent key-value storage for JSON documents.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;
    fn set(&self, key: &str, value: &Value) -> impl Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Process-local store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.entries().insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.put_value(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delete_value(key).await.map(|_| ())
    }
}
