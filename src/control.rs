//! Mission control state holder
//!
//! Owns the in-memory board, the storage backend, the snapshot ring and the
//! status line. Every change is followed by a save and, at most once a day,
//! an automatic snapshot. Failed operations leave the board untouched.

use chrono::NaiveDate;

use crate::board::{MissionDraft, MissionStatus, PersistedState, Summary};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::persistence::{self, Snapshot, SnapshotRing, StateStore};
use crate::platform::{Clock, Storage, SystemClock};
use crate::status::StatusLine;

/// A backup ready to hand to the user as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    /// `mission-control-backup-YYYYMMDD.json`
    pub file_name: String,
    /// Pretty-printed state
    pub bytes: Vec<u8>,
}

pub struct MissionControl<S, C = SystemClock> {
    storage: S,
    clock: C,
    config: Config,
    store: StateStore,
    snapshots: SnapshotRing,
    state: PersistedState,
    status: StatusLine,
}

impl<S: Storage> MissionControl<S, SystemClock> {
    /// Open with the wall clock and default configuration
    pub fn with_defaults(storage: S) -> Self {
        Self::open(storage, SystemClock, Config::default())
    }
}

impl<S: Storage, C: Clock> MissionControl<S, C> {
    /// Load the stored board (or the seeded defaults) and the snapshot ring
    pub fn open(storage: S, clock: C, config: Config) -> Self {
        let store = StateStore::new(config.storage_key.clone());
        let state = store
            .load(&storage)
            .unwrap_or_else(PersistedState::seeded);
        let snapshots =
            SnapshotRing::load(&storage, config.snapshot_key.clone(), config.max_snapshots);

        let mut control = Self {
            storage,
            clock,
            config,
            store,
            snapshots,
            state,
            status: StatusLine::new(),
        };
        control.commit();
        control
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Newest first
    pub fn snapshots(&self) -> &[Snapshot] {
        self.snapshots.entries()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub fn summary(&self) -> Summary {
        self.state.summary(self.today())
    }

    /// The live status message, if any
    pub fn status(&self) -> Option<&str> {
        self.status.current(self.clock.now())
    }

    /// Clear an expired status message; returns true if one was cleared
    pub fn tick(&mut self) -> bool {
        self.status.tick(self.clock.now())
    }

    // === Board editing ===

    /// Returns the new mission's id
    pub fn add_mission(&mut self, draft: MissionDraft) -> Result<String> {
        let id = self.next_id("m");
        let id = self
            .state
            .add_mission(draft, id, &self.config.default_owner)?
            .id
            .clone();
        self.commit();
        Ok(id)
    }

    /// Returns the new task's id
    pub fn add_task(&mut self, mission_id: &str, title: &str) -> Result<String> {
        let id = self.next_id("t");
        self.state.add_task(mission_id, id.clone(), title)?;
        self.commit();
        Ok(id)
    }

    pub fn toggle_task(&mut self, mission_id: &str, task_id: &str) -> Result<bool> {
        let done = self.state.toggle_task(mission_id, task_id)?;
        self.commit();
        Ok(done)
    }

    pub fn set_progress(&mut self, mission_id: &str, value: i64) -> Result<u8> {
        let progress = self.state.set_progress(mission_id, value)?;
        self.commit();
        Ok(progress)
    }

    pub fn update_status(&mut self, mission_id: &str, status: MissionStatus) -> Result<()> {
        self.state.update_status(mission_id, status)?;
        self.commit();
        Ok(())
    }

    pub fn remove_mission(&mut self, mission_id: &str) -> Result<()> {
        self.state.remove_mission(mission_id)?;
        self.commit();
        Ok(())
    }

    pub fn set_today_focus(&mut self, text: impl Into<String>) {
        self.state.set_today_focus(text);
        self.commit();
    }

    pub fn save_focus_log(&mut self) {
        self.state.save_focus_log();
        self.commit();
    }

    // === Backup / restore ===

    /// Export the board for download and record a manual snapshot
    pub fn backup_now(&mut self) -> Result<Backup> {
        let now = self.clock.now();
        let bytes = persistence::export_state(&self.state)?;
        let backup = Backup {
            file_name: persistence::backup_file_name(now.date_naive()),
            bytes,
        };

        let label = persistence::manual_label(now);
        let message = match self
            .snapshots
            .record_manual(&mut self.storage, &self.state, label, now)
        {
            Ok(_) => "Backup file saved and snapshot recorded",
            Err(e) => {
                log::warn!("Manual snapshot not stored: {}", e);
                "Backup file saved, but the snapshot could not be stored"
            }
        };
        self.status
            .post(message, self.config.backup_message_ttl, now);
        Ok(backup)
    }

    /// Replace the board with an uploaded backup, all or nothing
    pub fn restore_from_file(&mut self, bytes: &[u8]) -> Result<()> {
        let now = self.clock.now();
        match persistence::import_state(bytes) {
            Ok(state) => {
                log::info!("Restored {} missions from file", state.missions.len());
                self.state = state;
                self.commit();
                self.status
                    .post("Restore complete", self.config.restore_message_ttl, now);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected backup file: {}", e);
                self.status.post(
                    "Restore failed: the file is not a valid backup",
                    self.config.restore_message_ttl,
                    now,
                );
                Err(e)
            }
        }
    }

    /// Replace the board with the newest snapshot
    pub fn restore_latest_snapshot(&mut self) -> Result<()> {
        let now = self.clock.now();
        if self.snapshots.is_empty() {
            self.status.post(
                "No snapshot to restore",
                self.config.no_snapshot_message_ttl,
                now,
            );
            return Err(Error::Validation("no snapshot to restore".to_string()));
        }

        match self.snapshots.restore_latest() {
            Ok(state) => {
                self.state = state;
                self.commit();
                self.status.post(
                    "Restored from the latest snapshot",
                    self.config.restore_message_ttl,
                    now,
                );
                Ok(())
            }
            Err(e) => {
                log::warn!("Latest snapshot unusable: {}", e);
                self.status.post(
                    "The latest snapshot is damaged and cannot be restored",
                    self.config.restore_message_ttl,
                    now,
                );
                Err(e)
            }
        }
    }

    /// Wipe both storage keys and return to the seeded board.
    /// `confirm` is asked first; declining changes nothing.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> Result<()> {
        if !confirm() {
            return Err(Error::Cancelled("reset declined".to_string()));
        }

        if let Err(e) = self.store.clear(&mut self.storage) {
            log::warn!("Could not clear saved state: {}", e);
        }
        if let Err(e) = self.snapshots.clear(&mut self.storage) {
            log::warn!("Could not clear snapshots: {}", e);
        }
        self.state = PersistedState::seeded();
        self.commit();

        log::info!("Local data reset");
        self.status
            .post("Reset complete", self.config.reset_message_ttl, self.clock.now());
        Ok(())
    }

    /// Teardown: cancel the pending status message
    pub fn shutdown(&mut self) {
        self.status.clear();
    }

    /// Hand back the storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn next_id(&self, prefix: &str) -> String {
        crate::uid(prefix, self.clock.now().timestamp_millis())
    }

    /// Save the board and take the daily snapshot if due
    fn commit(&mut self) {
        if let Err(e) = self.store.save(&mut self.storage, &self.state) {
            log::warn!("Could not save missions: {}", e);
        }
        let now = self.clock.now();
        if let Err(e) = self
            .snapshots
            .record_if_new_day(&mut self.storage, &self.state, now)
        {
            log::warn!("Could not record daily snapshot: {}", e);
        }
    }
}
