use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::helpers::{parse_datetime, parse_json};
use super::Database;

/// A stored value with its last write time.
#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub key: String,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}

impl Database {
    pub async fn get_entry(&self, key: &str) -> Result<Option<KvEntry>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let row = conn
                .query_row(
                    "SELECT value, updated_at FROM kv_entries WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()
                .with_context(|| format!("failed to read key '{key}'"))?;

            match row {
                Some((raw, updated_at)) => Ok(Some(KvEntry {
                    value: parse_json(&raw, &key)?,
                    updated_at: parse_datetime(&updated_at, "updated_at")?,
                    key,
                })),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn put_value(&self, key: &str, value: &Value) -> Result<()> {
        let key = key.to_string();
        let serialized = serde_json::to_string(value)?;
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, serialized, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write key '{key}'"))?;
            Ok(())
        })
        .await
    }

    /// Returns whether a row was deleted.
    pub async fn delete_value(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.execute(move |conn| {
            let rows = conn
                .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
                .with_context(|| format!("failed to delete key '{key}'"))?;
            Ok(rows > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_db() -> (Database, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("mood-booster-{}.sqlite3", Uuid::new_v4()));
        (Database::new(path.clone()).unwrap(), path)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let (db, path) = temp_db();

        assert!(db.get_entry("mood-booster-data").await.unwrap().is_none());

        let value = json!({ "moodHistory": [], "completedActivities": [] });
        db.put_value("mood-booster-data", &value).await.unwrap();
        let entry = db.get_entry("mood-booster-data").await.unwrap().unwrap();
        assert_eq!(entry.value, value);
        assert_eq!(entry.key, "mood-booster-data");

        let replaced = json!({ "moodHistory": [1] });
        db.put_value("mood-booster-data", &replaced).await.unwrap();
        let entry = db.get_entry("mood-booster-data").await.unwrap().unwrap();
        assert_eq!(entry.value, replaced);

        assert!(db.delete_value("mood-booster-data").await.unwrap());
        assert!(!db.delete_value("mood-booster-data").await.unwrap());
        assert!(db.get_entry("mood-booster-data").await.unwrap().is_none());

        drop(db);
        let _ = std::fs::remove_file(path);
    }
}
