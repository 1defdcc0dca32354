//! Per-file upload progress.

use std::sync::Arc;

use dashmap::DashMap;
use rpa_blob::{percent, ProgressObserver};

use super::LocalId;

/// Upload percentage per queued file, shared with the observers of concurrent uploads.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    entries: Arc<DashMap<LocalId, u8>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer that records progress for `id`.
    pub fn observer(&self, id: LocalId) -> FileProgress {
        FileProgress {
            tracker: self.clone(),
            id,
        }
    }

    pub fn get(&self, id: LocalId) -> Option<u8> {
        self.entries.get(&id).map(|p| *p)
    }

    /// Partially uploaded, the state a progress overlay is shown for.
    pub fn is_in_flight(&self, id: LocalId) -> bool {
        matches!(self.get(id), Some(p) if p > 0 && p < 100)
    }

    pub fn snapshot(&self) -> Vec<(LocalId, u8)> {
        let mut all: Vec<(LocalId, u8)> = self.entries.iter().map(|e| (*e.key(), *e.value())).collect();
        all.sort();
        all
    }

    pub fn remove(&self, id: LocalId) {
        self.entries.remove(&id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Progress observer for one upload.
pub struct FileProgress {
    tracker: ProgressTracker,
    id: LocalId,
}

impl ProgressObserver for FileProgress {
    fn on_progress(&self, transferred: u64, total: u64) {
        self.tracker
            .entries
            .insert(self.id, percent(transferred, total));
    }
}
