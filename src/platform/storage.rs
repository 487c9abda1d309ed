//! String key-value storage backends

use std::collections::HashMap;

use crate::error::Result;
#[cfg(any(test, target_arch = "wasm32"))]
use crate::error::Error;

/// Minimal key-value contract shared by LocalStorage and its stand-ins
pub trait Storage {
    /// Read a value; `Ok(None)` when the key is absent
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Overwrite a value wholesale
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's LocalStorage, if the browser allows it
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| Error::StorageRead(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| Error::StorageWrite(format!("{:?}", e)))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner
            .remove_item(key)
            .map_err(|e| Error::StorageWrite(format!("{:?}", e)))
    }
}

/// Storage that rejects every write, for exercising failure paths
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ReadOnlyStorage {
    pub inner: MemoryStorage,
}

#[cfg(test)]
impl Storage for ReadOnlyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::StorageWrite("quota exceeded".to_string()))
    }

    fn remove_item(&mut self, _key: &str) -> Result<()> {
        Err(Error::StorageWrite("quota exceeded".to_string()))
    }
}
