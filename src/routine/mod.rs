// Routine module - Workout definition authored by the user
// Warm-up list, HIIT block and stretch list, exchanged as JSON

pub mod edit;
pub mod types;

pub use edit::PhaseList;
pub use types::{Exercise, HiitConfig, Routine};

/// Generate a fresh unique identifier for routines and exercises
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format a duration in seconds as "{m}m {s}s" (library summaries)
pub fn format_duration(total_secs: u32) -> String {
    format!("{}m {}s", total_secs / 60, total_secs % 60)
}
