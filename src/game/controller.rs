use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::activities::{select_activity, Catalog};
use crate::detection::{DetectionConfig, ExpressionSource, FrameSource, MoodAggregator};
use crate::models::{CompletedActivityEntry, MoodHistoryEntry};
use crate::stats::MoodInsights;
use crate::storage::{HistoryStore, KeyValueStore};
use crate::{log_info, log_warn};

use super::{ActivityTimer, GameEvent, GamePhase, GameState};

const ENABLE_LOGS: bool = true;

/// Owns the whole game: phase, history, camera and inference handles.
pub struct GameController<F, E, S> {
    state: GameState,
    history: HistoryStore<S>,
    catalog: Catalog,
    aggregator: MoodAggregator,
    frames: F,
    expressions: E,
    rng: StdRng,
    timer: ActivityTimer,
}

impl<F, E, S> GameController<F, E, S>
where
    F: FrameSource,
    E: ExpressionSource,
    S: KeyValueStore,
{
    /// Loads stored history from `store`. Starts in the loading phase.
    pub async fn new(frames: F, expressions: E, store: S, config: DetectionConfig) -> Self {
        Self {
            state: GameState::default(),
            history: HistoryStore::open(store).await,
            catalog: Catalog::builtin(),
            aggregator: MoodAggregator::new(config),
            frames,
            expressions,
            rng: StdRng::from_entropy(),
            timer: ActivityTimer::new(),
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn timer(&self) -> &ActivityTimer {
        &self.timer
    }

    pub fn insights(&self) -> Option<MoodInsights> {
        MoodInsights::from_history(self.history.mood_history(), Utc::now().date_naive())
    }

    /// Report whether the inference models finished loading.
    pub fn initialize(&mut self, models_loaded: bool) -> &GameState {
        if !models_loaded {
            log_warn!("expression models failed to load");
        }
        self.state.apply(GameEvent::ModelsLoaded(models_loaded));
        &self.state
    }

    /// Returns false when a detection could not start from the current phase.
    pub fn start_detection(&mut self) -> bool {
        if self.state.phase != GamePhase::Start {
            log_warn!("ignoring start request in {:?} phase", self.state.phase);
            return false;
        }
        self.state.apply(GameEvent::StartDetection);
        true
    }

    /// Samples the camera, records the mood and picks an activity.
    pub async fn run_detection(&mut self) -> &GameState {
        if self.state.phase != GamePhase::Detecting {
            log_warn!("no detection pending in {:?} phase", self.state.phase);
            return &self.state;
        }

        let run_id = Uuid::new_v4();
        log_info!("detection run {run_id} started");

        let reading = match self
            .aggregator
            .detect(&self.frames, &self.expressions)
            .await
        {
            Ok(reading) => reading,
            Err(failure) => {
                log_info!("detection run {run_id} failed: {}", failure.error_kind);
                self.state.apply(GameEvent::DetectionFailed(failure.message));
                return &self.state;
            }
        };

        // Selection sees the history as it was before this run.
        let activity = select_activity(
            &self.catalog,
            reading.mood,
            self.history.mood_history(),
            self.aggregator.config().recent_window,
            &mut self.rng,
        )
        .cloned();

        let entry = MoodHistoryEntry {
            mood: reading.mood,
            timestamp: Utc::now(),
            confidence: reading.confidence,
            raw_expression: reading.raw_expression,
            activity_id: activity.as_ref().map(|activity| activity.id.clone()),
        };
        if !self.history.append_mood(entry).await {
            log_warn!("detection run {run_id}: mood kept in memory only");
        }

        log_info!(
            "detection run {run_id} suggested {}",
            activity
                .as_ref()
                .map(|activity| activity.id.as_str())
                .unwrap_or("nothing")
        );
        self.state.apply(GameEvent::DetectionSucceeded {
            mood: reading.mood,
            activity,
        });
        &self.state
    }

    /// Starts the countdown for the suggested activity.
    pub fn start_activity(&mut self) -> Result<&ActivityTimer> {
        let activity = self
            .state
            .activity
            .as_ref()
            .filter(|_| self.state.phase == GamePhase::Suggestion)
            .ok_or_else(|| anyhow!("no suggested activity to start"))?;

        self.timer
            .begin(&activity.id, activity.duration_minutes, Instant::now());
        Ok(&self.timer)
    }

    /// Records the suggested activity as done, stopping its timer if running.
    pub async fn complete_activity(&mut self) -> Result<CompletedActivityEntry> {
        if self.state.phase != GamePhase::Suggestion {
            bail!("no activity is being suggested");
        }
        let (Some(activity), Some(mood)) = (self.state.activity.as_ref(), self.state.mood) else {
            bail!("no activity is being suggested");
        };

        let entry = CompletedActivityEntry {
            activity_id: activity.id.clone(),
            name: activity.name.clone(),
            mood,
            timestamp: Utc::now(),
        };
        self.history
            .append_completed(entry.clone(), &self.catalog)
            .await?;
        self.timer.complete();

        log_info!("completed activity {}", entry.activity_id);
        Ok(entry)
    }

    pub fn try_again(&mut self) -> &GameState {
        self.timer.cancel();
        self.state.apply(GameEvent::TryAgain);
        &self.state
    }

    /// Clears every stored mood and completion.
    pub async fn reset_all(&mut self) {
        self.timer.cancel();
        self.history.reset().await;
    }
}
