use serde::{Deserialize, Serialize};

use super::Mood;

/// A catalog entry suggested for one mood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration_minutes: u32,
    /// Human-readable duration such as "15-30 min".
    pub duration_label: String,
    /// Icon reference name for the front end.
    pub icon: String,
    pub mood: Mood,
}

impl Activity {
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }
}
