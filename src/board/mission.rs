use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle state of a mission
///
/// Legacy localized values are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MissionStatus {
    #[default]
    #[serde(rename = "in-progress", alias = "진행중")]
    InProgress,
    #[serde(rename = "done", alias = "완료")]
    Done,
    #[serde(rename = "delayed", alias = "지연")]
    Delayed,
    #[serde(rename = "pending", alias = "대기")]
    Pending,
}

impl MissionStatus {
    pub const ALL: [MissionStatus; 4] = [
        MissionStatus::InProgress,
        MissionStatus::Done,
        MissionStatus::Delayed,
        MissionStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::InProgress => "In progress",
            MissionStatus::Done => "Done",
            MissionStatus::Delayed => "Delayed",
            MissionStatus::Pending => "Pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in-progress" | "in progress" | "active" | "진행중" => Some(MissionStatus::InProgress),
            "done" | "complete" | "completed" | "완료" => Some(MissionStatus::Done),
            "delayed" | "late" | "지연" => Some(MissionStatus::Delayed),
            "pending" | "waiting" | "대기" => Some(MissionStatus::Pending),
            _ => None,
        }
    }
}

/// Mission priority, serialized as `H` / `M` / `L`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MissionPriority {
    #[serde(rename = "H")]
    High,
    #[default]
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Low,
}

impl MissionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionPriority::High => "High",
            MissionPriority::Medium => "Medium",
            MissionPriority::Low => "Low",
        }
    }
}

/// A checklist item owned by a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub done: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            done: false,
        }
    }
}

/// A tracked personal goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    /// Free-text description
    pub detail: String,
    pub due: NaiveDate,
    pub owner: String,
    pub status: MissionStatus,
    pub priority: MissionPriority,
    /// Ordered checklist
    pub tasks: Vec<Task>,
    /// Completion percentage, 0..=100
    pub progress: u8,
}

/// Percentage of completed tasks, rounded half up; 0 for an empty checklist
pub fn progress_from_tasks(tasks: &[Task]) -> u8 {
    let total = tasks.len() as u64;
    if total == 0 {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.done).count() as u64;
    ((done * 200 + total) / (2 * total)) as u8
}

/// Clamp a manual progress value into 0..=100
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

impl Mission {
    /// Manual override; does not touch the checklist
    pub fn set_progress(&mut self, value: i64) {
        self.progress = clamp_progress(value);
    }

    /// Append an undone task and recompute progress
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
        self.progress = progress_from_tasks(&self.tasks);
    }

    /// Flip a task's done flag and recompute progress.
    /// Returns the new done state.
    pub fn toggle_task(&mut self, task_id: &str) -> Result<bool> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| Error::NotFound(format!("task {} in mission {}", task_id, self.id)))?;
        task.done = !task.done;
        let done = task.done;
        self.progress = progress_from_tasks(&self.tasks);
        Ok(done)
    }

    /// Due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due < today
    }

    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}
