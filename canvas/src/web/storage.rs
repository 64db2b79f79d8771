//! `window.localStorage` as a [`KeyValueStore`].

use super::{js_error, window};
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// # Errors
    /// Storage is disabled (privacy mode, sandboxed frame).
    pub fn new() -> Result<Self, StorageError> {
        let storage = window()
            .and_then(|win| win.local_storage())
            .map_err(|e| StorageError::Backend(js_error(&e)))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("localStorage read of {key} failed: {}", js_error(&e));
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| StorageError::Backend(js_error(&e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| StorageError::Backend(js_error(&e)))
    }
}
