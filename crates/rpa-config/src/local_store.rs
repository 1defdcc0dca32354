//! Durable key-value storage scoped to one console installation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::ConfigError;

/// Well-known keys.
pub mod keys {
    /// Verified phone number of the signed-in user.
    pub const PHONE_NUMBER: &str = "ph";
    /// Cached display name of the signed-in user.
    pub const FULL_NAME: &str = "fullName";
    /// RFC 3339 timestamp of the last successful verification.
    pub const VERIFIED_AT: &str = "verifiedAt";
    /// Identity provider uid of the signed-in credential.
    pub const UID: &str = "uid";
}

/// String key-value storage that survives restarts.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
    fn remove(&self, key: &str) -> Result<(), ConfigError>;
    /// Remove every key.
    fn clear(&self) -> Result<(), ConfigError>;
}

fn lock(entries: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    // A poisoned map is still a consistent map of strings.
    entries.lock().unwrap_or_else(|e| e.into_inner())
}

/// Local storage kept in a single pretty-printed JSON object file.
///
/// The whole file is rewritten on every mutation.
pub struct FileLocalStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileLocalStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => parse_entries(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ConfigError::Read(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

fn parse_entries(contents: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    let object = value.as_object().ok_or(ConfigError::InvalidLayout)?;
    object
        .iter()
        .map(|(k, v)| {
            v.as_str()
                .map(|s| (k.clone(), s.to_string()))
                .ok_or(ConfigError::InvalidLayout)
        })
        .collect()
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ConfigError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ConfigError> {
        let mut entries = lock(&self.entries);
        entries.clear();
        self.save(&entries)
    }
}

/// In-memory local storage, for tests.
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConfigError> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), ConfigError> {
        lock(&self.entries).clear();
        Ok(())
    }
}
