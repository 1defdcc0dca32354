//! Blob stores backed by process memory or a local directory.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use rpa_blob::{BlobError, BlobLocator, BlobPath, BlobStore, ProgressObserver};
use tokio::io::AsyncWriteExt;
use tracing::debug;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Clone, Debug)]
struct StoredBlob {
    content_type: String,
    bytes: Vec<u8>,
}

/// Blob store held in process memory.
pub struct MemoryBlobStore {
    locator: BlobLocator,
    blobs: DashMap<BlobPath, StoredBlob>,
}

impl MemoryBlobStore {
    pub fn new(locator: BlobLocator) -> Self {
        Self {
            locator,
            blobs: DashMap::new(),
        }
    }

    pub fn contains(&self, path: &BlobPath) -> bool {
        self.blobs.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Content type and bytes of a stored blob.
    pub fn content(&self, path: &BlobPath) -> Option<(String, Vec<u8>)> {
        self.blobs
            .get(path)
            .map(|b| (b.content_type.clone(), b.bytes.clone()))
    }

    /// All stored paths in sorted order.
    pub fn paths(&self) -> Vec<BlobPath> {
        let mut paths: Vec<BlobPath> = self.blobs.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        path: &BlobPath,
        content_type: &str,
        bytes: Vec<u8>,
        progress: &dyn ProgressObserver,
    ) -> Result<String, BlobError> {
        let total = bytes.len() as u64;
        progress.on_progress(0, total);
        let mut sent = 0u64;
        for chunk in bytes.chunks(CHUNK_SIZE) {
            sent += chunk.len() as u64;
            tokio::task::yield_now().await;
            progress.on_progress(sent, total);
        }

        self.blobs.insert(
            path.clone(),
            StoredBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        debug!(path = %path, bytes = total, "Stored blob");
        Ok(self.locator.url_for(path))
    }

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobError> {
        self.blobs
            .remove(path)
            .map(|_| ())
            .ok_or(BlobError::NotFound)
    }

    fn resolve(&self, reference: &str) -> Result<BlobPath, BlobError> {
        self.locator.resolve(reference)
    }
}

/// Blob store writing one file per blob under a root directory.
pub struct DirBlobStore {
    locator: BlobLocator,
    root: PathBuf,
}

impl DirBlobStore {
    pub fn new(root: impl Into<PathBuf>, locator: BlobLocator) -> Self {
        Self {
            locator,
            root: root.into(),
        }
    }

    fn file_path(&self, path: &BlobPath) -> PathBuf {
        let mut file = self.root.clone();
        for segment in path.segments() {
            file.push(segment);
        }
        file
    }
}

#[async_trait]
impl BlobStore for DirBlobStore {
    async fn put(
        &self,
        path: &BlobPath,
        content_type: &str,
        bytes: Vec<u8>,
        progress: &dyn ProgressObserver,
    ) -> Result<String, BlobError> {
        let file_path = self.file_path(path);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let total = bytes.len() as u64;
        progress.on_progress(0, total);
        let mut file = tokio::fs::File::create(&file_path).await?;
        let mut sent = 0u64;
        for chunk in bytes.chunks(CHUNK_SIZE) {
            file.write_all(chunk).await?;
            sent += chunk.len() as u64;
            progress.on_progress(sent, total);
        }
        file.flush().await?;

        debug!(path = %path, content_type, bytes = total, "Wrote blob file");
        Ok(self.locator.url_for(path))
    }

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobError> {
        tokio::fs::remove_file(self.file_path(path)).await?;
        Ok(())
    }

    fn resolve(&self, reference: &str) -> Result<BlobPath, BlobError> {
        self.locator.resolve(reference)
    }
}
