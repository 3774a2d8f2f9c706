use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::detection::DetectionConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    detection: DetectionConfig,
}

/// User-tunable settings persisted as pretty JSON.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn detection(&self) -> DetectionConfig {
        match self.data.read() {
            Ok(guard) => guard.detection.clone(),
            Err(poisoned) => poisoned.into_inner().detection.clone(),
        }
    }

    pub fn update_detection(&self, config: DetectionConfig) -> Result<()> {
        validate(&config)?;

        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.detection = config;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        validate(&data.detection)?;

        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

fn validate(config: &DetectionConfig) -> Result<()> {
    if config.sample_count == 0 {
        bail!("sample count must be greater than zero");
    }
    if !(0.0..=1.0).contains(&config.min_confidence) {
        bail!(
            "minimum confidence must be within 0..=1, got {}",
            config.min_confidence
        );
    }
    if !(0.0..=255.0).contains(&config.lighting_threshold) {
        bail!(
            "lighting threshold must be within 0..=255, got {}",
            config.lighting_threshold
        );
    }
    Ok(())
}
