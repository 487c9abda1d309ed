//! Current-state record

use crate::board::PersistedState;
use crate::error::{Error, Result};
use crate::platform::Storage;

use super::backup;

/// Holds the whole persisted state under one storage key
#[derive(Debug, Clone)]
pub struct StateStore {
    key: String,
}

impl StateStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored record. `Ok(None)` when nothing is stored,
    /// `StorageRead` when the record is unreadable or corrupt.
    pub fn try_load<S: Storage>(&self, storage: &S) -> Result<Option<PersistedState>> {
        let Some(json) = storage.get_item(&self.key)? else {
            return Ok(None);
        };
        backup::import_str(&json)
            .map(Some)
            .map_err(|e| Error::StorageRead(e.to_string()))
    }

    /// Load the stored state, or `None` so the caller falls back to defaults
    pub fn load<S: Storage>(&self, storage: &S) -> Option<PersistedState> {
        match self.try_load(storage) {
            Ok(Some(state)) => {
                log::info!("Loaded {} missions from storage", state.missions.len());
                Some(state)
            }
            Ok(None) => {
                log::info!("No saved missions found, using defaults");
                None
            }
            Err(e) => {
                log::warn!("Ignoring stored state: {}", e);
                None
            }
        }
    }

    /// Overwrite the stored record wholesale
    pub fn save<S: Storage>(&self, storage: &mut S, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        storage.set_item(&self.key, &json)
    }

    pub fn clear<S: Storage>(&self, storage: &mut S) -> Result<()> {
        storage.remove_item(&self.key)
    }
}
