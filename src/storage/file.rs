use std::{fs, path::PathBuf, sync::RwLock};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::KeyValueStore;

/// All keys in one pretty-printed JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<Map<String, Value>>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    log::warn!("Ignoring unreadable store {}: {err}", path.display());
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        apply(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write store to {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let guard = match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.update(|data| {
            data.insert(key.to_string(), value.clone());
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.update(|data| {
            data.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("mood-booster-{}", Uuid::new_v4()))
            .join("store.json")
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = temp_path();
        let store = JsonFileStore::new(path.clone()).unwrap();
        store.set("a", &json!({ "x": 1 })).await.unwrap();
        store.set("b", &json!([1, 2, 3])).await.unwrap();
        store.remove("b").await.unwrap();

        let reopened = JsonFileStore::new(path.clone()).unwrap();
        assert_eq!(reopened.get("a").await.unwrap(), Some(json!({ "x": 1 })));
        assert_eq!(reopened.get("b").await.unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(path.clone()).unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
