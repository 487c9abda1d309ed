//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory on native)
//! - Time (wall clock, or a manual clock in tests)

pub mod clock;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{MemoryStorage, Storage};
