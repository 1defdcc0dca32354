//! JSON snapshot files.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a snapshot, treating a missing file as empty.
pub(crate) fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|e| format!("failed to parse {}: {}", path.display(), e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(format!("failed to read {}: {}", path.display(), e)),
    }
}

/// Write a snapshot, creating parent directories.
pub(crate) async fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))
}
