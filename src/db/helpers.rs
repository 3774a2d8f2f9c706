use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_json(value: &str, key: &str) -> Result<serde_json::Value> {
    serde_json::from_str(value).with_context(|| format!("stored value for '{key}' is not valid JSON"))
}
