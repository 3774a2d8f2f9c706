//! Summaries of mood history for the insights view.
//!
//! Days are UTC calendar days.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Mood, MoodCounts, MoodHistoryEntry};

/// Insights need at least this many entries.
pub const MIN_ENTRIES_FOR_INSIGHTS: usize = 3;
pub const RECENT_MOODS: usize = 5;
pub const MAX_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodShare {
    pub mood: Mood,
    pub count: u32,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyMoods {
    pub date: NaiveDate,
    pub happy: u32,
    pub sad: u32,
    pub neutral: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub count: u32,
    pub most_frequent: Mood,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodInsights {
    pub dominant_mood: Mood,
    pub message: &'static str,
    pub distribution: Vec<MoodShare>,
    pub daily: Vec<DailyMoods>,
    pub today: Option<TodaySummary>,
}

fn count_moods<'a>(entries: impl IntoIterator<Item = &'a MoodHistoryEntry>) -> MoodCounts {
    let mut counts = MoodCounts::default();
    for entry in entries {
        counts.record(entry.mood);
    }
    counts
}

/// Moods that occur at all, most frequent first.
pub fn distribution(history: &[MoodHistoryEntry]) -> Vec<MoodShare> {
    let counts = count_moods(history);
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<MoodShare> = Mood::ALL
        .into_iter()
        .filter(|mood| counts.get(*mood) > 0)
        .map(|mood| {
            let count = counts.get(mood);
            MoodShare {
                mood,
                count,
                percentage: (f64::from(count) * 100.0 / f64::from(total)).round() as u32,
            }
        })
        .collect();
    // Stable, so equal counts keep happy/sad/neutral order.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

pub fn dominant_mood(history: &[MoodHistoryEntry]) -> Option<Mood> {
    count_moods(history).leader().map(|(mood, _)| mood)
}

/// The most recent entries, oldest first.
pub fn recent_moods(history: &[MoodHistoryEntry]) -> &[MoodHistoryEntry] {
    let start = history.len().saturating_sub(RECENT_MOODS);
    &history[start..]
}

/// Per-day counts for the latest `MAX_DAYS` days that have entries, oldest first.
pub fn daily_breakdown(history: &[MoodHistoryEntry]) -> Vec<DailyMoods> {
    let mut by_day: BTreeMap<NaiveDate, MoodCounts> = BTreeMap::new();
    for entry in history {
        by_day
            .entry(entry.timestamp.date_naive())
            .or_default()
            .record(entry.mood);
    }

    let skip = by_day.len().saturating_sub(MAX_DAYS);
    by_day
        .into_iter()
        .skip(skip)
        .map(|(date, counts)| DailyMoods {
            date,
            happy: counts.get(Mood::Happy),
            sad: counts.get(Mood::Sad),
            neutral: counts.get(Mood::Neutral),
        })
        .collect()
}

pub fn today_summary(history: &[MoodHistoryEntry], today: NaiveDate) -> Option<TodaySummary> {
    let counts = count_moods(
        history
            .iter()
            .filter(|entry| entry.timestamp.date_naive() == today),
    );
    counts.leader().map(|(most_frequent, _)| TodaySummary {
        count: counts.total(),
        most_frequent,
    })
}

pub fn insight_message(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => {
            "You've been mostly happy! Keep up the positive energy and remember to share your joy with others."
        }
        Mood::Sad => {
            "You've been feeling down lately. Remember that it's okay to feel this way, and consider trying some of our mood-boosting activities."
        }
        Mood::Neutral => {
            "Your mood has been mostly neutral. This is a great opportunity to try new activities that could bring more joy to your day."
        }
    }
}

impl MoodInsights {
    /// `None` until the history has `MIN_ENTRIES_FOR_INSIGHTS` entries.
    pub fn from_history(history: &[MoodHistoryEntry], today: NaiveDate) -> Option<Self> {
        if history.len() < MIN_ENTRIES_FOR_INSIGHTS {
            return None;
        }
        let dominant_mood = dominant_mood(history)?;

        Some(Self {
            dominant_mood,
            message: insight_message(dominant_mood),
            distribution: distribution(history),
            daily: daily_breakdown(history),
            today: today_summary(history, today),
        })
    }
}
