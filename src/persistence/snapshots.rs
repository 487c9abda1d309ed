//! Snapshot ring
//!
//! Newest first, bounded, with at most one automatic snapshot per local
//! calendar day. Manual backups always append; both kinds share capacity.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::PersistedState;
use crate::error::{Error, Result};
use crate::platform::Storage;

use super::backup;

/// Label format for automatic snapshots
const DAY_LABEL_FORMAT: &str = "%Y-%m-%d";

/// How a snapshot came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    /// Daily snapshot taken on state change (records without a kind are automatic)
    #[default]
    Auto,
    /// "Backup now"
    Manual,
}

/// An immutable copy of the full persisted state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    /// `YYYY-MM-DD` for automatic snapshots
    pub label: String,
    /// Pretty-printed [`PersistedState`] JSON
    pub payload: String,
    #[serde(default)]
    pub kind: SnapshotKind,
}

impl Snapshot {
    fn capture(
        state: &PersistedState,
        label: String,
        kind: SnapshotKind,
        now: DateTime<Local>,
    ) -> Result<Self> {
        Ok(Self {
            id: crate::uid("s", now.timestamp_millis()),
            saved_at: now.with_timezone(&Utc),
            label,
            payload: backup::export_string(state)?,
            kind,
        })
    }

    /// Calendar day this automatic snapshot stands for
    pub fn auto_day(&self) -> Option<NaiveDate> {
        match self.kind {
            SnapshotKind::Auto => NaiveDate::parse_from_str(&self.label, DAY_LABEL_FORMAT).ok(),
            SnapshotKind::Manual => None,
        }
    }

    /// Parse the payload back into a state
    pub fn restore(&self) -> Result<PersistedState> {
        backup::import_str(&self.payload)
    }
}

/// Label for a manual backup taken at `now`
pub fn manual_label(now: DateTime<Local>) -> String {
    format!("Manual {}", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Bounded snapshot history stored under one key
#[derive(Debug, Clone)]
pub struct SnapshotRing {
    key: String,
    capacity: usize,
    /// Newest first
    entries: Vec<Snapshot>,
    /// Day of the newest retained automatic snapshot
    last_auto_day: Option<NaiveDate>,
}

impl SnapshotRing {
    /// Empty ring
    pub fn new(key: impl Into<String>, capacity: usize) -> Self {
        Self {
            key: key.into(),
            capacity: capacity.max(1),
            entries: Vec::new(),
            last_auto_day: None,
        }
    }

    /// Load the ring from storage; corrupt data yields an empty ring
    pub fn load<S: Storage>(storage: &S, key: impl Into<String>, capacity: usize) -> Self {
        let mut ring = Self::new(key, capacity);

        let stored = match storage.get_item(&ring.key) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Snapshot storage unreadable: {}", e);
                None
            }
        };
        if let Some(json) = stored {
            match serde_json::from_str::<Vec<Value>>(&json) {
                Ok(records) => {
                    let mut entries: Vec<Snapshot> = records
                        .into_iter()
                        .enumerate()
                        .filter_map(|(i, record)| match serde_json::from_value(record) {
                            Ok(snapshot) => Some(snapshot),
                            Err(e) => {
                                log::warn!("Skipping corrupt snapshot #{}: {}", i, e);
                                None
                            }
                        })
                        .collect();
                    entries.truncate(ring.capacity);
                    ring.last_auto_day = entries.iter().filter_map(Snapshot::auto_day).max();
                    ring.entries = entries;
                    log::info!("Loaded {} snapshots", ring.entries.len());
                }
                Err(e) => log::warn!("Ignoring corrupt snapshots: {}", e),
            }
        }

        ring
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last_auto_day(&self) -> Option<NaiveDate> {
        self.last_auto_day
    }

    /// Take the day's automatic snapshot unless one already exists.
    /// Returns the new snapshot, or `None` when today is already covered.
    pub fn record_if_new_day<S: Storage>(
        &mut self,
        storage: &mut S,
        state: &PersistedState,
        now: DateTime<Local>,
    ) -> Result<Option<&Snapshot>> {
        let today = now.date_naive();
        if self.last_auto_day == Some(today) {
            return Ok(None);
        }

        let label = today.format(DAY_LABEL_FORMAT).to_string();
        let snapshot = Snapshot::capture(state, label, SnapshotKind::Auto, now)?;
        self.push(storage, snapshot)?;
        self.last_auto_day = Some(today);
        log::info!("Daily snapshot recorded for {}", today);
        Ok(self.entries.first())
    }

    /// Always prepend, regardless of day
    pub fn record_manual<S: Storage>(
        &mut self,
        storage: &mut S,
        state: &PersistedState,
        label: String,
        now: DateTime<Local>,
    ) -> Result<&Snapshot> {
        let snapshot = Snapshot::capture(state, label, SnapshotKind::Manual, now)?;
        self.push(storage, snapshot)?;
        log::info!("Manual snapshot recorded ({} retained)", self.entries.len());
        self.entries
            .first()
            .ok_or_else(|| Error::Internal("snapshot ring empty after insert".to_string()))
    }

    /// Parse the newest snapshot
    pub fn restore_latest(&self) -> Result<PersistedState> {
        let latest = self
            .latest()
            .ok_or_else(|| Error::Validation("no snapshot to restore".to_string()))?;
        latest
            .restore()
            .map_err(|e| Error::Validation(format!("latest snapshot is damaged: {}", e)))
    }

    /// Drop every snapshot and the storage key
    pub fn clear<S: Storage>(&mut self, storage: &mut S) -> Result<()> {
        storage.remove_item(&self.key)?;
        self.entries.clear();
        self.last_auto_day = None;
        Ok(())
    }

    /// Prepend and evict past capacity. The in-memory ring only changes
    /// once the write succeeds.
    fn push<S: Storage>(&mut self, storage: &mut S, snapshot: Snapshot) -> Result<()> {
        let mut next = Vec::with_capacity(self.capacity);
        next.push(snapshot);
        next.extend(self.entries.iter().take(self.capacity - 1).cloned());

        let json = serde_json::to_string(&next)?;
        storage.set_item(&self.key, &json)?;

        self.entries = next;
        if self.last_auto_day.is_some()
            && !self.entries.iter().any(|s| s.auto_day() == self.last_auto_day)
        {
            self.last_auto_day = self.entries.iter().filter_map(Snapshot::auto_day).max();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use crate::platform::storage::ReadOnlyStorage;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_one_auto_snapshot_per_day() {
        let mut storage = MemoryStorage::new();
        let mut ring = SnapshotRing::new("snaps", 14);
        let state = PersistedState::seeded();

        assert!(ring.record_if_new_day(&mut storage, &state, at(1, 9)).unwrap().is_some());
        assert!(ring.record_if_new_day(&mut storage, &state, at(1, 18)).unwrap().is_none());
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.latest().unwrap().label, "2026-03-01");

        assert!(ring.record_if_new_day(&mut storage, &state, at(2, 9)).unwrap().is_some());
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_manual_bypasses_day_rule() {
        let mut storage = MemoryStorage::new();
        let mut ring = SnapshotRing::new("snaps", 14);
        let state = PersistedState::seeded();

        ring.record_if_new_day(&mut storage, &state, at(1, 9)).unwrap();
        let manual = ring
            .record_manual(&mut storage, &state, manual_label(at(1, 10)), at(1, 10))
            .unwrap();
        assert_eq!(manual.kind, SnapshotKind::Manual);
        assert_eq!(manual.label, "Manual 2026-03-01 10:00:00");
        assert_eq!(ring.len(), 2);

        // A manual snapshot at the head does not hide today's automatic one
        assert!(ring.record_if_new_day(&mut storage, &state, at(1, 11)).unwrap().is_none());
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut storage = MemoryStorage::new();
        let mut ring = SnapshotRing::new("snaps", 14);
        let state = PersistedState::default();

        for day in 1..=15 {
            ring.record_if_new_day(&mut storage, &state, at(day, 9)).unwrap();
        }
        assert_eq!(ring.len(), 14);
        assert_eq!(ring.latest().unwrap().label, "2026-03-15");
        assert_eq!(ring.entries().last().unwrap().label, "2026-03-02");

        let reloaded = SnapshotRing::load(&storage, "snaps", 14);
        assert_eq!(reloaded.entries(), ring.entries());
        assert_eq!(reloaded.last_auto_day(), NaiveDate::from_ymd_opt(2026, 3, 15));
    }

    #[test]
    fn test_manual_flood_evicts_auto_and_reopens_day() {
        let mut storage = MemoryStorage::new();
        let mut ring = SnapshotRing::new("snaps", 2);
        let state = PersistedState::default();

        ring.record_if_new_day(&mut storage, &state, at(1, 9)).unwrap();
        ring.record_manual(&mut storage, &state, "a".to_string(), at(1, 10)).unwrap();
        ring.record_manual(&mut storage, &state, "b".to_string(), at(1, 11)).unwrap();
        assert_eq!(ring.last_auto_day(), None);

        assert!(ring.record_if_new_day(&mut storage, &state, at(1, 12)).unwrap().is_some());
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_restore_latest() {
        let mut storage = MemoryStorage::new();
        let mut ring = SnapshotRing::new("snaps", 14);

        assert!(matches!(ring.restore_latest(), Err(Error::Validation(_))));

        let mut state = PersistedState::seeded();
        state.set_today_focus("snapshot me");
        ring.record_manual(&mut storage, &state, "m".to_string(), at(1, 9)).unwrap();
        assert_eq!(ring.restore_latest().unwrap(), state);
    }

    #[test]
    fn test_restore_latest_damaged() {
        let mut storage = MemoryStorage::new();
        let damaged = vec![Snapshot {
            id: "s-1".to_string(),
            saved_at: Utc::now(),
            label: "2026-03-01".to_string(),
            payload: r#"{"missions": "oops"}"#.to_string(),
            kind: SnapshotKind::Auto,
        }];
        storage
            .set_item("snaps", &serde_json::to_string(&damaged).unwrap())
            .unwrap();

        let ring = SnapshotRing::load(&storage, "snaps", 14);
        assert_eq!(ring.len(), 1);
        assert!(matches!(ring.restore_latest(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_load_legacy_records() {
        let mut storage = MemoryStorage::new();
        let json = r#"[
            {"id": "s-2", "savedAt": "2026-03-02T01:00:00.000Z", "label": "수동 2026. 3. 2.", "payload": "{}"},
            {"id": "s-1", "savedAt": "2026-03-01T01:00:00.000Z", "label": "2026-03-01", "payload": "{}"}
        ]"#;
        storage.set_item("snaps", json).unwrap();

        let ring = SnapshotRing::load(&storage, "snaps", 14);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.entries()[0].auto_day(), None);
        assert_eq!(ring.last_auto_day(), NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_load_skips_only_bad_records() {
        let mut storage = MemoryStorage::new();
        let json = r#"[
            {"id": "s-3", "savedAt": "2026-03-03T01:00:00Z", "label": "2026-03-03", "payload": "{}"},
            {"id": "s-2", "savedAt": "", "label": "2026-03-02", "payload": "{}"},
            {"id": "s-1", "savedAt": "2026-03-01T01:00:00Z", "label": "2026-03-01", "payload": "{}"}
        ]"#;
        storage.set_item("snaps", json).unwrap();

        let mut ring = SnapshotRing::load(&storage, "snaps", 14);
        let ids: Vec<&str> = ring.entries().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s-3", "s-1"]);
        assert_eq!(ring.last_auto_day(), NaiveDate::from_ymd_opt(2026, 3, 3));

        ring.record_if_new_day(&mut storage, &PersistedState::default(), at(4, 9))
            .unwrap();
        let reloaded = SnapshotRing::load(&storage, "snaps", 14);
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item("snaps", "[{broken").unwrap();
        let ring = SnapshotRing::load(&storage, "snaps", 14);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_ring_unchanged() {
        let mut storage = ReadOnlyStorage::default();
        let mut ring = SnapshotRing::new("snaps", 14);
        let result = ring.record_if_new_day(&mut storage, &PersistedState::default(), at(1, 9));
        assert!(matches!(result, Err(Error::StorageWrite(_))));
        assert!(ring.is_empty());
        assert_eq!(ring.last_auto_day(), None);
    }

    #[test]
    fn test_clear() {
        let mut storage = MemoryStorage::new();
        let mut ring = SnapshotRing::new("snaps", 14);
        ring.record_if_new_day(&mut storage, &PersistedState::default(), at(1, 9))
            .unwrap();
        ring.clear(&mut storage).unwrap();
        assert!(ring.is_empty());
        assert!(storage.is_empty());
        assert_eq!(ring.last_auto_day(), None);
    }
}
