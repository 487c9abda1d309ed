//! Mission board model
//!
//! Missions own their tasks; progress is either overridden by hand
//! (clamped to 0..=100) or recomputed from the task checklist.

pub mod mission;
pub mod state;

pub use mission::{
    Mission, MissionPriority, MissionStatus, Task, clamp_progress, progress_from_tasks,
};
pub use state::{MissionDraft, PersistedState, Summary};
