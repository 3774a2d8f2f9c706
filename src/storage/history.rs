use anyhow::{bail, Result};

use crate::activities::Catalog;
use crate::models::{CompletedActivityEntry, MoodData, MoodHistoryEntry};
use crate::{log_error, log_info, log_warn};

use super::KeyValueStore;

const ENABLE_LOGS: bool = true;

/// Key holding the whole mood/activity blob.
pub const STORAGE_KEY: &str = "mood-booster-data";

/// Append-only mood and activity log backed by a key-value store.
///
/// Storage failures are logged and absorbed: a failed read yields empty history
/// and a failed write keeps the in-memory copy.
pub struct HistoryStore<S> {
    store: S,
    data: MoodData,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub async fn open(store: S) -> Self {
        let data = load(&store).await;
        Self { store, data }
    }

    pub fn data(&self) -> &MoodData {
        &self.data
    }

    pub fn mood_history(&self) -> &[MoodHistoryEntry] {
        &self.data.mood_history
    }

    pub fn completed_activities(&self) -> &[CompletedActivityEntry] {
        &self.data.completed_activities
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns whether the write reached the store.
    pub async fn append_mood(&mut self, mut entry: MoodHistoryEntry) -> bool {
        if !(0.0..=1.0).contains(&entry.confidence) {
            log_warn!(
                "clamping out-of-range confidence {} for {} entry",
                entry.confidence,
                entry.mood
            );
            entry.confidence = if entry.confidence.is_nan() {
                0.0
            } else {
                entry.confidence.clamp(0.0, 1.0)
            };
        }

        self.data.mood_history.push(entry);
        self.persist().await
    }

    /// Records a finished activity. The id must exist in `catalog`.
    pub async fn append_completed(
        &mut self,
        entry: CompletedActivityEntry,
        catalog: &Catalog,
    ) -> Result<bool> {
        if catalog.get(&entry.activity_id).is_none() {
            bail!("unknown activity id '{}'", entry.activity_id);
        }

        self.data.completed_activities.push(entry);
        Ok(self.persist().await)
    }

    /// Drops every stored mood and completion.
    pub async fn reset(&mut self) {
        self.data = MoodData::default();
        match self.store.remove(STORAGE_KEY).await {
            Ok(()) => log_info!("mood history reset"),
            Err(err) => log_error!("failed to clear stored mood history: {err:?}"),
        }
    }

    /// Re-read the store, replacing the in-memory copy.
    pub async fn reload(&mut self) {
        self.data = load(&self.store).await;
    }

    async fn persist(&self) -> bool {
        if self.data.is_empty() {
            return true;
        }

        let value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(err) => {
                log_error!("failed to serialize mood history: {err}");
                return false;
            }
        };

        match self.store.set(STORAGE_KEY, &value).await {
            Ok(()) => true,
            Err(err) => {
                log_error!("failed to save mood history: {err:?}");
                false
            }
        }
    }
}

async fn load<S: KeyValueStore>(store: &S) -> MoodData {
    match store.get(STORAGE_KEY).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(data) => data,
            Err(err) => {
                log_error!("stored mood history is unreadable, starting fresh: {err}");
                MoodData::default()
            }
        },
        Ok(None) => MoodData::default(),
        Err(err) => {
            log_error!("failed to load mood history: {err:?}");
            MoodData::default()
        }
    }
}
