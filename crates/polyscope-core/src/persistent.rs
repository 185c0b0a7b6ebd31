//! Persistent per-structure options.
//!
//! A [`PersistentValue`] is an option whose value survives the structure it
//! belongs to. Values are keyed by the structure's unique prefix plus the
//! property name and live in a process-wide [`PersistentCache`]. A value only
//! enters the cache once it has been changed explicitly, so defaults never
//! shadow later changes to the default itself.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

static CACHE: OnceLock<Mutex<PersistentCache>> = OnceLock::new();

/// Key-value store backing all persistent options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistentCache {
    values: HashMap<String, serde_json::Value>,
}

impl PersistentCache {
    /// Looks up and decodes a cached value.
    ///
    /// Values that no longer decode as `T` are treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("ignoring persistent value '{key}': {e}");
                None
            }
        }
    }

    /// Stores a value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Returns whether a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes every value whose key starts with `prefix`.
    pub fn remove_prefix(&mut self, prefix: &str) {
        self.values.retain(|k, _| !k.starts_with(prefix));
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes the cache as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads a cache previously written by [`PersistentCache::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Copies all values of `other` into this cache, overwriting equal keys.
    pub fn merge(&mut self, other: PersistentCache) {
        self.values.extend(other.values);
    }
}

/// Runs `f` with the process-wide cache.
pub fn with_persistent_cache<F, R>(f: F) -> R
where
    F: FnOnce(&mut PersistentCache) -> R,
{
    let lock = CACHE.get_or_init(|| Mutex::new(PersistentCache::default()));
    let mut guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Saves the process-wide cache to a JSON file.
pub fn save_persistent_cache(path: impl AsRef<Path>) -> Result<()> {
    with_persistent_cache(|cache| cache.save(path))
}

/// Loads a JSON file into the process-wide cache.
pub fn load_persistent_cache(path: impl AsRef<Path>) -> Result<()> {
    let loaded = PersistentCache::load(path)?;
    with_persistent_cache(|cache| cache.merge(loaded));
    Ok(())
}

/// An option value that is remembered across structure lifetimes.
#[derive(Debug, Clone)]
pub struct PersistentValue<T> {
    key: String,
    value: T,
    manually_changed: bool,
}

impl<T> PersistentValue<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Creates the value, preferring a previously cached value over `default`.
    pub fn new(key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        match with_persistent_cache(|cache| cache.get::<T>(&key)) {
            Some(value) => Self {
                key,
                value,
                manually_changed: true,
            },
            None => Self {
                key,
                value: default,
                manually_changed: false,
            },
        }
    }

    /// The cache key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access for widgets that edit in place.
    ///
    /// Call [`PersistentValue::manually_changed`] afterwards to persist the edit.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Sets and persists a new value.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.manually_changed();
    }

    /// Persists the current value.
    pub fn manually_changed(&mut self) {
        self.manually_changed = true;
        let result = with_persistent_cache(|cache| cache.set(&self.key, &self.value));
        if let Err(e) = result {
            log::warn!("failed to persist '{}': {e}", self.key);
        }
    }

    /// Whether the value was set explicitly, now or in an earlier structure.
    pub fn is_manually_changed(&self) -> bool {
        self.manually_changed
    }
}
