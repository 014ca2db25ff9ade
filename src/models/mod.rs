// Models module

pub mod mood_log;

// Re-export commonly used types
pub use mood_log::{CreateMoodLogRequest, MoodLog, UpdateMoodLogRequest};
