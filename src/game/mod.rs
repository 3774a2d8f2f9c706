mod controller;
mod state;
mod timer;

pub use controller::GameController;
pub use state::{transition, GameEvent, GamePhase, GameState, MODELS_FAILED_MESSAGE};
pub use timer::{format_clock, ActivityTimer, TimerStatus};
