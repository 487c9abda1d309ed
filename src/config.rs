//! Runtime configuration
//!
//! Defaults come from [`crate::consts`]; tests override keys and capacity.

use std::time::Duration;

use crate::consts;

/// Storage layout and message timing for a [`crate::MissionControl`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Key holding the current state record
    pub storage_key: String,
    /// Key holding the snapshot ring
    pub snapshot_key: String,
    /// Snapshot ring capacity
    pub max_snapshots: usize,
    /// Owner assigned to new missions with a blank owner
    pub default_owner: String,

    // === Status message lifetimes ===
    pub reset_message_ttl: Duration,
    pub backup_message_ttl: Duration,
    pub restore_message_ttl: Duration,
    pub no_snapshot_message_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: consts::STORAGE_KEY.to_string(),
            snapshot_key: consts::SNAPSHOT_KEY.to_string(),
            max_snapshots: consts::MAX_SNAPSHOTS,
            default_owner: consts::DEFAULT_OWNER.to_string(),

            reset_message_ttl: consts::RESET_MESSAGE_TTL,
            backup_message_ttl: consts::BACKUP_MESSAGE_TTL,
            restore_message_ttl: consts::RESTORE_MESSAGE_TTL,
            no_snapshot_message_ttl: consts::NO_SNAPSHOT_MESSAGE_TTL,
        }
    }
}

impl Config {
    /// Use a different snapshot capacity (at least one entry is always kept)
    pub fn with_max_snapshots(mut self, max_snapshots: usize) -> Self {
        self.max_snapshots = max_snapshots.max(1);
        self
    }

    /// Namespace both storage keys under a prefix
    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.storage_key = format!("{}:{}", prefix, consts::STORAGE_KEY);
        self.snapshot_key = format!("{}:{}", prefix, consts::SNAPSHOT_KEY);
        self
    }
}
