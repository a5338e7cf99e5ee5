//! Persistence boundary.
//!
//! Every feature owns a disjoint set of keys in one string-keyed store
//! (browser `localStorage` in production). Values are JSON. Reads and writes
//! are best effort: failures come back as [`StorageError`] and the callers in
//! this crate log them and fall back to in-memory defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

use crate::util::cwarn;

pub mod keys {
    pub const THEME: &str = "cave-theme";
    pub const LANGUAGE: &str = "cave-language";
    pub const BACKGROUND_VOLUME: &str = "cave-bg-volume";
    pub const CUSTOM_CURSOR: &str = "cave-custom-cursor";
    pub const FAVORITE_GAMES: &str = "cave-favorite-games";
    pub const FAVORITE_TRACKS: &str = "cave-favorite-tracks";
    pub const SNAKE_HIGH_SCORE: &str = "cave-snake-highscore";
    pub const PONG_HIGH_SCORE: &str = "cave-pong-highscore";
    pub const CLICKER_SAVE: &str = "cave-clicker-save";
    pub const PLAYER_POSITION: &str = "player-position";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage backend rejected the request: {0}")]
    Backend(String),
    #[error("stored value could not be (de)serialized: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serde(e.to_string())
    }
}

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn raw() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }

    pub fn is_available() -> bool {
        Self::raw().is_ok()
    }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::raw()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::raw()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::raw()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}

/// In-memory store. Used when the browser store is missing (private mode,
/// embedded webviews) and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation errors.
    #[cfg(test)]
    pub fn failing() -> Self {
        Self {
            items: RefCell::new(HashMap::new()),
            failing: true,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing {
            return Err(StorageError::Backend("read refused".into()));
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Backend("write refused".into()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Backend("remove refused".into()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser store when present, memory otherwise.
pub fn open_store() -> Rc<dyn KeyValueStore> {
    if BrowserStore::is_available() {
        Rc::new(BrowserStore)
    } else {
        cwarn("localStorage unavailable, settings will not survive a reload");
        Rc::new(MemoryStore::new())
    }
}

/// Outcome of a load: the persisted value, or the default used in its place.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Persisted(T),
    Defaulted(T),
}

impl<T> Loaded<T> {
    pub fn into_inner(self) -> T {
        match self {
            Loaded::Persisted(v) | Loaded::Defaulted(v) => v,
        }
    }

    #[cfg(test)]
    pub fn is_persisted(&self) -> bool {
        matches!(self, Loaded::Persisted(_))
    }
}

/// Reads and decodes `key`. Bare strings written by older builds (e.g. a
/// theme stored as `ocean` instead of `"ocean"`) are accepted too.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Ok(Some(v)),
        Err(e) => serde_json::from_value(serde_json::Value::String(raw))
            .map(Some)
            .map_err(|_| e.into()),
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}

/// Load with fallback; failures are logged, never propagated.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> Loaded<T> {
    match read_json(store, key) {
        Ok(Some(v)) => Loaded::Persisted(v),
        Ok(None) => Loaded::Defaulted(default),
        Err(e) => {
            cwarn(&format!("load {}: {}", key, e));
            Loaded::Defaulted(default)
        }
    }
}

/// Save, logging and swallowing failures.
pub fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = save_json(store, key, value) {
        cwarn(&format!("save {}: {}", key, e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Shade {
        Ocean,
        Forest,
    }

    #[test]
    fn missing_key_is_defaulted() {
        let store = MemoryStore::new();
        let loaded = load_json(&store, keys::SNAKE_HIGH_SCORE, 0u32);
        assert_eq!(loaded, Loaded::Defaulted(0));
    }

    #[test]
    fn saved_value_is_persisted_on_reload() {
        let store = MemoryStore::new();
        save_json(&store, keys::SNAKE_HIGH_SCORE, &120u32).unwrap();
        let loaded = load_json(&store, keys::SNAKE_HIGH_SCORE, 0u32);
        assert!(loaded.is_persisted());
        assert_eq!(loaded.into_inner(), 120);
    }

    #[test]
    fn bare_string_values_still_decode() {
        let store = MemoryStore::new();
        store.set_item(keys::THEME, "forest").unwrap();
        let loaded: Option<Shade> = read_json(&store, keys::THEME).unwrap();
        assert_eq!(loaded, Some(Shade::Forest));
        store.set_item(keys::THEME, "\"ocean\"").unwrap();
        let loaded: Option<Shade> = read_json(&store, keys::THEME).unwrap();
        assert_eq!(loaded, Some(Shade::Ocean));
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set_item(keys::PONG_HIGH_SCORE, "not a number").unwrap();
        let loaded = load_json(&store, keys::PONG_HIGH_SCORE, 7u32);
        assert_eq!(loaded, Loaded::Defaulted(7));
    }

    #[test]
    fn failing_store_degrades_silently() {
        let store = MemoryStore::failing();
        persist(&store, keys::THEME, "ocean");
        assert!(save_json(&store, keys::THEME, "ocean").is_err());
        assert_eq!(load_json(&store, keys::THEME, 3u8), Loaded::Defaulted(3));
    }

    #[test]
    fn remove_clears_key() {
        let store = MemoryStore::new();
        persist(&store, keys::CUSTOM_CURSOR, &false);
        assert_eq!(store.len(), 1);
        store.remove_item(keys::CUSTOM_CURSOR).unwrap();
        assert_eq!(store.get_item(keys::CUSTOM_CURSOR).unwrap(), None);
    }
}
