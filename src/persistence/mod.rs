//! Save/load persistence with validation
//!
//! Features:
//! - Single current-state record, overwritten on every change
//! - Bounded snapshot ring, one automatic snapshot per day
//! - Pretty-printed JSON export and validated import

pub mod backup;
pub mod snapshots;
pub mod store;

pub use backup::{backup_file_name, export_state, export_string, import_state, import_str};
pub use snapshots::{Snapshot, SnapshotKind, SnapshotRing, manual_label};
pub use store::StateStore;
