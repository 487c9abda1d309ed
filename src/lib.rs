//! Mission Control - personal mission dashboard state
//!
//! Core modules:
//! - `board`: Missions, tasks, progress rules and the dashboard summary
//! - `persistence`: Current-state record, snapshot ring, backup export/import
//! - `platform`: Browser/native platform abstraction (storage, time)
//! - `status`: Transient, auto-clearing user-facing messages
//! - `control`: The state holder tying everything together

pub mod board;
pub mod config;
pub mod control;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod status;

pub use board::{Mission, MissionDraft, MissionPriority, MissionStatus, PersistedState, Summary, Task};
pub use config::Config;
pub use control::{Backup, MissionControl};
pub use error::{Error, Result};

use rand::Rng;

/// Dashboard configuration constants
pub mod consts {
    use std::time::Duration;

    /// LocalStorage key for the current state record
    pub const STORAGE_KEY: &str = "mission-control:data:v1";
    /// LocalStorage key for the snapshot ring
    pub const SNAPSHOT_KEY: &str = "mission-control:snapshots:v1";
    /// Maximum snapshots retained (oldest evicted first)
    pub const MAX_SNAPSHOTS: usize = 14;

    /// Owner used when a new mission leaves the field blank
    pub const DEFAULT_OWNER: &str = "Me";

    /// Status message lifetimes
    pub const RESET_MESSAGE_TTL: Duration = Duration::from_millis(3000);
    pub const BACKUP_MESSAGE_TTL: Duration = Duration::from_millis(2000);
    pub const RESTORE_MESSAGE_TTL: Duration = Duration::from_millis(2500);
    pub const NO_SNAPSHOT_MESSAGE_TTL: Duration = Duration::from_millis(2000);
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate an identifier of the form `<prefix>-<base36 millis>-<5 random base36 chars>`
pub fn uid(prefix: &str, now_millis: i64) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..5)
        .map(|_| BASE36[rng.random_range(0..36)] as char)
        .collect();
    format!("{}-{}-{}", prefix, to_base36(now_millis.max(0) as u64), suffix)
}

/// Render an unsigned integer in lowercase base 36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_uid_shape() {
        let id = uid("m", 36);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "m");
        assert_eq!(parts[1], "10");
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
