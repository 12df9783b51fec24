//! Key-value persistence shared by every dashboard widget.
//!
//! Values are stored as JSON text under string keys. Reads never fail
//! outward: a missing key and a value that no longer deserializes are both
//! reported through [`StoreRead`] so callers can fall back to a default while
//! still being able to tell the two apart.

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const DARK_MODE_KEY: &str = "darkMode";
pub const COUNTDOWNS_KEY: &str = "countdowns";
pub const POMODORO_COUNT_KEY: &str = "pomodoroCount";
pub const CUSTOM_LINKS_KEY: &str = "customLinks";
pub const TASKS_KEY: &str = "tasks";
pub const MEMO_KEY: &str = "memo";
pub const WEATHER_API_KEY: &str = "weatherApiKey";

/// Raw string storage backend.
pub trait KeyValueStore: Send + Sync {
    /// Return the raw JSON text stored under `key`, if any.
    fn read_raw(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Overwrite the raw JSON text stored under `key`.
    fn write_raw(&self, key: &str, raw: &str) -> anyhow::Result<()>;
}

/// Shared handle every widget receives at construction.
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// Result of a typed read.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRead<T> {
    Present(T),
    Absent,
    /// The key exists but could not be read back as `T`.
    Corrupt(String),
}

impl<T> StoreRead<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            StoreRead::Present(value) => Some(value),
            StoreRead::Absent | StoreRead::Corrupt(_) => None,
        }
    }

    pub fn unwrap_or_else(self, default: impl FnOnce() -> T) -> T {
        self.into_option().unwrap_or_else(default)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, StoreRead::Present(_))
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreRead::Corrupt(_))
    }
}

/// Read and deserialize the value under `key`.
///
/// A stored JSON `null` or an empty value counts as absent. Anything that
/// fails to parse is logged and reported as [`StoreRead::Corrupt`].
pub fn get<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreRead<T> {
    let raw = match store.read_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return StoreRead::Absent,
        Err(e) => {
            tracing::warn!(key, "failed to read stored value: {e:#}");
            return StoreRead::Corrupt(format!("{e:#}"));
        }
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return StoreRead::Absent;
    }
    match serde_json::from_str::<T>(trimmed) {
        Ok(value) => StoreRead::Present(value),
        Err(e) => {
            tracing::warn!(key, "stored value is corrupt, falling back to default: {e}");
            StoreRead::Corrupt(e.to_string())
        }
    }
}

/// Serialize `value` and store it under `key`, replacing any previous value.
pub fn set<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize value for `{key}`"))?;
    store.write_raw(key, &json)
}

/// Volatile store used for tests and sessions without a store directory.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> StoreHandle {
        Arc::new(Self::new())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn read_raw(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write_raw(&self, key: &str, raw: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), raw.to_string());
        Ok(())
    }
}

/// Directory backed store keeping one `<key>.json` file per key.
///
/// Each key lives in its own file so a damaged file only resets the widget
/// that owns it.
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        anyhow::ensure!(is_valid_key(key), "invalid store key `{key}`");
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl KeyValueStore for JsonDirStore {
    fn read_raw(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn write_raw(&self, key: &str, raw: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        std::fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
