use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Activity, Mood, MoodHistoryEntry};

use super::Catalog;

/// How many same-mood history entries count as "recent".
pub const RECENT_WINDOW: usize = 3;

/// Activity ids referenced by the last `window` history entries for `mood`.
/// Entries are filtered by mood before the window is taken.
pub fn recent_activity_ids<'a>(
    history: &'a [MoodHistoryEntry],
    mood: Mood,
    window: usize,
) -> HashSet<&'a str> {
    history
        .iter()
        .rev()
        .filter(|entry| entry.mood == mood)
        .take(window)
        .filter_map(|entry| entry.activity_id.as_deref())
        .collect()
}

/// Pick an activity for `mood` that was not suggested in the recent window.
/// Falls back to the whole mood catalog when every entry was used recently.
/// Returns `None` only if the catalog has nothing for this mood.
pub fn select_activity<'c, R: Rng + ?Sized>(
    catalog: &'c Catalog,
    mood: Mood,
    history: &[MoodHistoryEntry],
    window: usize,
    rng: &mut R,
) -> Option<&'c Activity> {
    let mood_activities: Vec<&Activity> = catalog.for_mood(mood).collect();
    let recent = recent_activity_ids(history, mood, window);

    let fresh: Vec<&Activity> = mood_activities
        .iter()
        .copied()
        .filter(|activity| !recent.contains(activity.id.as_str()))
        .collect();

    let pool = if fresh.is_empty() {
        log::debug!("all {mood} activities used recently; allowing repeats");
        &mood_activities
    } else {
        &fresh
    };

    pool.choose(rng).copied()
}
