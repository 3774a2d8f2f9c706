pub mod activity;
pub mod history;
pub mod mood;

pub use activity::Activity;
pub use history::{CompletedActivityEntry, MoodData, MoodHistoryEntry};
pub use mood::{ErrorCounts, ErrorKind, ExpressionScores, Mood, MoodCounts, EXPRESSION_VOCABULARY};
