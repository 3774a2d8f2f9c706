pub mod activities;
pub mod db;
pub mod detection;
pub mod game;
pub mod models;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod utils;


pub use activities::{select_activity, Catalog};
pub use db::Database;
pub use detection::{
    AggregateReading, AggregateResult, DetectionConfig, DetectionFailure, ExpressionSource,
    FaceDetection, Frame, FrameSource, LightingGate, MoodAggregator, SampleClassifier,
};
pub use game::{GameController, GameEvent, GamePhase, GameState};
pub use models::{
    Activity, CompletedActivityEntry, ErrorKind, ExpressionScores, Mood, MoodData,
    MoodHistoryEntry,
};
pub use settings::SettingsStore;
pub use stats::MoodInsights;
pub use storage::{HistoryStore, JsonFileStore, KeyValueStore, MemoryStore};
pub use utils::init_logging;
