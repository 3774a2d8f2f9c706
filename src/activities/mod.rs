pub mod catalog;
pub mod selector;

pub use catalog::{parse_duration_minutes, Catalog};
pub use selector::{recent_activity_ids, select_activity, RECENT_WINDOW};
