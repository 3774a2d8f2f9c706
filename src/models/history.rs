use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Mood;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodHistoryEntry {
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
    pub confidence: f64,
    pub raw_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedActivityEntry {
    /// Older blobs stored this field as `id`.
    #[serde(alias = "id")]
    pub activity_id: String,
    pub name: String,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

/// Everything persisted under the history key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodData {
    #[serde(default)]
    pub mood_history: Vec<MoodHistoryEntry>,
    #[serde(default)]
    pub completed_activities: Vec<CompletedActivityEntry>,
}

impl MoodData {
    pub fn is_empty(&self) -> bool {
        self.mood_history.is_empty() && self.completed_activities.is_empty()
    }
}
