//! The persisted aggregate and the board editing operations

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::mission::{Mission, MissionPriority, MissionStatus, Task, clamp_progress};
use crate::error::{Error, Result};

/// Everything the dashboard stores: missions plus the focus notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub missions: Vec<Mission>,
    /// Today's one-line focus (draft text)
    #[serde(default, deserialize_with = "string_or_null")]
    pub today_focus: String,
    /// Last saved focus note
    #[serde(default, deserialize_with = "string_or_null")]
    pub focus_log: String,
}

/// Absent and `null` text fields both read as empty
fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Form input for a new mission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionDraft {
    pub title: String,
    pub detail: String,
    pub due: NaiveDate,
    pub owner: String,
    pub priority: MissionPriority,
}

/// Dashboard headline numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// Mean progress, rounded; 0 with no missions
    pub average_progress: u8,
    /// Missions due before today
    pub overdue: usize,
}

impl PersistedState {
    /// Board shown on first run or after a reset
    pub fn seeded() -> Self {
        fn date(y: i32, m: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
        }
        fn task(id: &str, title: &str, done: bool) -> Task {
            Task {
                id: id.to_string(),
                title: title.to_string(),
                done,
            }
        }

        let missions = vec![
            Mission {
                id: "m-1".to_string(),
                title: "Tech level-up".to_string(),
                detail: "Streamline the app delivery pipeline with CI automation.".to_string(),
                due: date(2026, 2, 28),
                owner: crate::consts::DEFAULT_OWNER.to_string(),
                status: MissionStatus::InProgress,
                priority: MissionPriority::High,
                tasks: vec![
                    task("t-1", "Build the mission control board", true),
                    task("t-2", "Automate CI retries and alerts", true),
                    task("t-3", "Write the local hosting guide", true),
                ],
                progress: 75,
            },
            Mission {
                id: "m-2".to_string(),
                title: "Financial freedom prep".to_string(),
                detail: "Track weekly budget, positions and risk checks on one screen.".to_string(),
                due: date(2026, 3, 31),
                owner: crate::consts::DEFAULT_OWNER.to_string(),
                status: MissionStatus::InProgress,
                priority: MissionPriority::High,
                tasks: vec![
                    task("t-4", "List fixed and variable costs", true),
                    task("t-5", "Write the month-end investment checklist", false),
                    task("t-6", "Add exchange and interest rate alerts", false),
                ],
                progress: 52,
            },
            Mission {
                id: "m-3".to_string(),
                title: "Housing move".to_string(),
                detail: "Compare nearby complexes and schedule site visits.".to_string(),
                due: date(2026, 3, 15),
                owner: crate::consts::DEFAULT_OWNER.to_string(),
                status: MissionStatus::Pending,
                priority: MissionPriority::Medium,
                tasks: vec![
                    task("t-7", "Refresh the rent and fees comparison", false),
                    task("t-8", "Book site visits", false),
                    task("t-9", "Check move-in conditions", false),
                ],
                progress: 38,
            },
        ];

        Self {
            missions,
            today_focus: String::new(),
            focus_log: String::new(),
        }
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    fn mission_mut(&mut self, id: &str) -> Result<&mut Mission> {
        self.missions
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::NotFound(format!("mission {}", id)))
    }

    /// Append a new in-progress mission with an empty checklist.
    /// Title and detail are required; a blank owner falls back to `default_owner`.
    pub fn add_mission(
        &mut self,
        draft: MissionDraft,
        id: String,
        default_owner: &str,
    ) -> Result<&Mission> {
        let title = draft.title.trim();
        let detail = draft.detail.trim();
        if title.is_empty() || detail.is_empty() {
            return Err(Error::Validation(
                "a mission needs a title and a detail".to_string(),
            ));
        }
        let owner = match draft.owner.trim() {
            "" => default_owner.to_string(),
            owner => owner.to_string(),
        };

        self.missions.push(Mission {
            id,
            title: title.to_string(),
            detail: detail.to_string(),
            due: draft.due,
            owner,
            status: MissionStatus::InProgress,
            priority: draft.priority,
            tasks: Vec::new(),
            progress: 0,
        });
        Ok(&self.missions[self.missions.len() - 1])
    }

    /// Append a checklist item; a blank title is rejected
    pub fn add_task(&mut self, mission_id: &str, task_id: String, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("a task needs a title".to_string()));
        }
        self.mission_mut(mission_id)?.add_task(Task::new(task_id, title));
        Ok(())
    }

    pub fn toggle_task(&mut self, mission_id: &str, task_id: &str) -> Result<bool> {
        self.mission_mut(mission_id)?.toggle_task(task_id)
    }

    /// Manual progress override; returns the clamped value
    pub fn set_progress(&mut self, mission_id: &str, value: i64) -> Result<u8> {
        let mission = self.mission_mut(mission_id)?;
        mission.set_progress(value);
        Ok(mission.progress)
    }

    pub fn update_status(&mut self, mission_id: &str, status: MissionStatus) -> Result<()> {
        self.mission_mut(mission_id)?.status = status;
        Ok(())
    }

    /// Remove a mission together with its tasks
    pub fn remove_mission(&mut self, mission_id: &str) -> Result<Mission> {
        let index = self
            .missions
            .iter()
            .position(|m| m.id == mission_id)
            .ok_or_else(|| Error::NotFound(format!("mission {}", mission_id)))?;
        Ok(self.missions.remove(index))
    }

    pub fn set_today_focus(&mut self, text: impl Into<String>) {
        self.today_focus = text.into();
    }

    /// Copy today's focus into the focus log
    pub fn save_focus_log(&mut self) {
        self.focus_log = self.today_focus.clone();
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        let total = self.missions.len();
        let completed = self
            .missions
            .iter()
            .filter(|m| m.status == MissionStatus::Done)
            .count();
        let in_progress = self
            .missions
            .iter()
            .filter(|m| m.status == MissionStatus::InProgress)
            .count();
        let average_progress = if total == 0 {
            0
        } else {
            let sum: u64 = self.missions.iter().map(|m| m.progress as u64).sum();
            let total = total as u64;
            clamp_progress(((sum * 2 + total) / (2 * total)) as i64)
        };
        let overdue = self.missions.iter().filter(|m| m.is_overdue(today)).count();

        Summary {
            total,
            completed,
            in_progress,
            average_progress,
            overdue,
        }
    }
}
