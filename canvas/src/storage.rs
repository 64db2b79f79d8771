//! Client-side persistence of player identity and draft maps.
//!
//! [`KeyValueStore`] is the seam: the browser binding backs it with
//! `localStorage`, tests and the CLI with [`MemoryStore`]. [`IdentityStore`]
//! owns the key scheme.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;

use serde::Serialize;
use wire::event::PlayerId;
use wire::map::GameMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("stored draft is not valid json: {0}")]
    Corrupt(String),
}

/// String key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Backend refused the write (quota, privacy mode).
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    /// Backend refused the removal.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Who this client is in one game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub id: Option<PlayerId>,
    pub token: Option<String>,
}

/// Default player name: `Anon-` and the last seven digits of the clock.
#[must_use]
pub fn anonymous_name(now_ms: u64) -> String {
    format!("Anon-{:07}", now_ms % 10_000_000)
}

fn name_key(game_id: &str) -> String {
    format!("game-{game_id}-name")
}

fn id_key(game_id: &str) -> String {
    format!("game-{game_id}-id")
}

fn token_key(game_id: &str) -> String {
    format!("game-{game_id}-token")
}

fn draft_key(map_id: &str) -> String {
    format!("gameMap-{map_id}")
}

/// Identity and draft persistence over any [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct IdentityStore<S> {
    store: S,
}

impl<S: KeyValueStore> IdentityStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Identity for `game_id`. A missing name is generated and written back
    /// so a reconnect keeps it; an unparsable id is treated as absent.
    ///
    /// # Errors
    /// Writing the generated name failed.
    pub fn load(&mut self, game_id: &str, now_ms: u64) -> Result<Identity, StorageError> {
        let name = match self.store.get(&name_key(game_id)).filter(|name| !name.is_empty()) {
            Some(name) => name,
            None => {
                let name = anonymous_name(now_ms);
                self.store.set(&name_key(game_id), &name)?;
                name
            }
        };
        let id = self.store.get(&id_key(game_id)).and_then(|raw| match raw.trim().parse::<PlayerId>() {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("ignoring stored player id {raw:?}: {e}");
                None
            }
        });
        let token = self.store.get(&token_key(game_id)).filter(|token| !token.is_empty());
        Ok(Identity { name, id, token })
    }

    /// # Errors
    /// Backend write failure.
    pub fn save_name(&mut self, game_id: &str, name: &str) -> Result<(), StorageError> {
        self.store.set(&name_key(game_id), name)
    }

    /// # Errors
    /// Backend write failure.
    pub fn save_player_id(&mut self, game_id: &str, id: PlayerId) -> Result<(), StorageError> {
        self.store.set(&id_key(game_id), &id.to_string())
    }

    /// # Errors
    /// Backend write failure.
    pub fn save_token(&mut self, game_id: &str, token: &str) -> Result<(), StorageError> {
        self.store.set(&token_key(game_id), token)
    }

    /// Drop every identity key for `game_id`.
    ///
    /// # Errors
    /// Backend failure.
    pub fn forget(&mut self, game_id: &str) -> Result<(), StorageError> {
        self.store.remove(&name_key(game_id))?;
        self.store.remove(&id_key(game_id))?;
        self.store.remove(&token_key(game_id))
    }

    /// # Errors
    /// Serialization or backend write failure.
    pub fn save_draft(&mut self, map_id: &str, map: &GameMap) -> Result<(), StorageError> {
        let json = serde_json::to_string(map).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.store.set(&draft_key(map_id), &json)
    }

    /// The stored draft for `map_id`, if any.
    ///
    /// # Errors
    /// The stored value is not a map.
    pub fn load_draft(&self, map_id: &str) -> Result<Option<GameMap>, StorageError> {
        let Some(json) = self.store.get(&draft_key(map_id)) else {
            return Ok(None);
        };
        serde_json::from_str(&json).map(Some).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    /// # Errors
    /// Backend failure.
    pub fn remove_draft(&mut self, map_id: &str) -> Result<(), StorageError> {
        self.store.remove(&draft_key(map_id))
    }
}
