use serde::Serialize;

use crate::models::{Activity, Mood};

pub const MODELS_FAILED_MESSAGE: &str =
    "Failed to load facial detection models. Please refresh the page or try a different browser.";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    #[default]
    Loading,
    Start,
    Detecting,
    Suggestion,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: GamePhase,
    pub mood: Option<Mood>,
    pub activity: Option<Activity>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ModelsLoaded(bool),
    StartDetection,
    DetectionSucceeded {
        mood: Mood,
        activity: Option<Activity>,
    },
    DetectionFailed(String),
    TryAgain,
}

/// Next state for `event`. Events that do not apply to the current phase
/// leave the state untouched.
pub fn transition(state: &GameState, event: GameEvent) -> GameState {
    use GameEvent::*;
    use GamePhase::*;

    match (state.phase, event) {
        (Loading, ModelsLoaded(true)) => GameState {
            phase: Start,
            ..GameState::default()
        },
        (Loading, ModelsLoaded(false)) => GameState {
            phase: Error,
            error: Some(MODELS_FAILED_MESSAGE.to_string()),
            ..GameState::default()
        },
        (Start, StartDetection) => GameState {
            phase: Detecting,
            error: None,
            ..state.clone()
        },
        (Detecting, DetectionSucceeded { mood, activity }) => GameState {
            phase: Suggestion,
            mood: Some(mood),
            activity,
            error: None,
        },
        (Detecting, DetectionFailed(message)) => GameState {
            phase: Start,
            error: Some(message),
            ..state.clone()
        },
        (Start | Suggestion, TryAgain) => GameState {
            phase: Start,
            error: None,
            ..state.clone()
        },
        _ => state.clone(),
    }
}

impl GameState {
    pub fn apply(&mut self, event: GameEvent) {
        *self = transition(self, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::Catalog;

    fn started() -> GameState {
        transition(&GameState::default(), GameEvent::ModelsLoaded(true))
    }

    #[test]
    fn test_model_load_outcomes() {
        assert_eq!(started().phase, GamePhase::Start);

        let failed = transition(&GameState::default(), GameEvent::ModelsLoaded(false));
        assert_eq!(failed.phase, GamePhase::Error);
        assert_eq!(failed.error.as_deref(), Some(MODELS_FAILED_MESSAGE));

        // error is terminal
        assert_eq!(transition(&failed, GameEvent::TryAgain), failed);
    }

    #[test]
    fn test_start_detection_only_from_start() {
        let mut state = started();
        state.error = Some("Too dark".into());
        state.apply(GameEvent::StartDetection);
        assert_eq!(state.phase, GamePhase::Detecting);
        assert!(state.error.is_none());

        let again = transition(&state, GameEvent::StartDetection);
        assert_eq!(again, state);
    }

    #[test]
    fn test_detection_outcomes() {
        let activity = Catalog::builtin().get("sad2").cloned();
        let mut detecting = started();
        detecting.apply(GameEvent::StartDetection);

        let ok = transition(
            &detecting,
            GameEvent::DetectionSucceeded {
                mood: Mood::Sad,
                activity: activity.clone(),
            },
        );
        assert_eq!(ok.phase, GamePhase::Suggestion);
        assert_eq!(ok.mood, Some(Mood::Sad));
        assert_eq!(ok.activity, activity);

        let failed = transition(&detecting, GameEvent::DetectionFailed("No face".into()));
        assert_eq!(failed.phase, GamePhase::Start);
        assert_eq!(failed.error.as_deref(), Some("No face"));

        let back = transition(&ok, GameEvent::TryAgain);
        assert_eq!(back.phase, GamePhase::Start);
    }

    #[test]
    fn test_results_ignored_outside_detecting() {
        let state = started();
        let next = transition(
            &state,
            GameEvent::DetectionSucceeded {
                mood: Mood::Happy,
                activity: None,
            },
        );
        assert_eq!(next, state);
    }
}
